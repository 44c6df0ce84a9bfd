//! sec 命令行入口
//!
//! 用法：
//!   sec --mode encrypt --file <path>          原地加密文件
//!   sec --mode decrypt --file <path> -o <out> 解密到另一个文件
//!   cat a | sec --mode encrypt > a.sec        管道模式
//!
//! 口令来源依次为：`--pass`、环境变量 `SEC_TOOL_PASS`、终端交互输入。
//! 日志写到 stderr，stdout 只用于数据。

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Encrypt,
    Decrypt,
}

#[derive(Debug, Parser)]
#[command(name = "sec", version, about = "Encrypt or decrypt files and pipes with a passphrase")]
struct Cli {
    #[arg(long, value_enum)]
    mode: Mode,

    /// Path to the file, or `-` for stdin/stdout
    #[arg(long, default_value = "-")]
    file: String,

    /// Write the result here instead of replacing `--file`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Passphrase
    #[arg(long, env = "SEC_TOOL_PASS", hide_env_values = true)]
    pass: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// 数据来源与去向
#[derive(Debug, PartialEq, Eq)]
enum Target<'a> {
    /// stdin → stdout
    Pipe,
    File { input: &'a Path, output: &'a Path },
}

fn resolve_target(cli: &Cli) -> anyhow::Result<Target<'_>> {
    if cli.file == "-" {
        if cli.output.is_some() {
            bail!("--output requires --file");
        }
        return Ok(Target::Pipe);
    }

    let input = Path::new(&cli.file);
    let output = cli.output.as_deref().unwrap_or(input);
    Ok(Target::File { input, output })
}

/// 优先使用命令行 / 环境变量中的口令，否则通过 `prompt` 交互输入；
/// 加密时需要二次确认。
fn read_passphrase<P>(
    cli_pass: Option<String>,
    mode: Mode,
    mut prompt: P,
) -> anyhow::Result<Zeroizing<String>>
where
    P: FnMut(&str) -> io::Result<String>,
{
    let pass = match cli_pass {
        Some(p) => Zeroizing::new(p),
        None => {
            let p = Zeroizing::new(prompt("Passphrase: ").context("failed to read passphrase")?);
            if mode == Mode::Encrypt {
                let confirm = Zeroizing::new(
                    prompt("Confirm passphrase: ").context("failed to read passphrase")?,
                );
                if *p != *confirm {
                    bail!("passphrases do not match");
                }
            }
            p
        }
    };

    if pass.is_empty() {
        bail!("passphrase must not be empty");
    }
    Ok(pass)
}

fn run(mut cli: Cli) -> anyhow::Result<()> {
    let cli_pass = cli.pass.take();
    let target = resolve_target(&cli)?;
    let pass = read_passphrase(cli_pass, cli.mode, |p| rpassword::prompt_password(p))?;
    let passphrase = pass.as_bytes();

    match (target, cli.mode) {
        (Target::Pipe, Mode::Encrypt) => {
            let stdout = BufWriter::new(io::stdout().lock());
            sec::encrypt_stream(io::stdin().lock(), stdout, passphrase)
                .context("encrypting stdin")?
        }
        (Target::Pipe, Mode::Decrypt) => {
            let stdout = BufWriter::new(io::stdout().lock());
            sec::decrypt_stream(io::stdin().lock(), stdout, passphrase)
                .context("decrypting stdin")?
        }
        (Target::File { input, output }, Mode::Encrypt) => {
            sec::encrypt_file(input, output, passphrase)
                .with_context(|| format!("encrypting {}", input.display()))?
        }
        (Target::File { input, output }, Mode::Decrypt) => {
            sec::decrypt_file(input, output, passphrase)
                .with_context(|| format!("decrypting {}", input.display()))?
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}
