use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use color_print::cprintln;
use retroemu::shell::{self, Reply};
use retroemu::{Config, Emulator, EngineKind, Error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE, disable_help_subcommand = true)]
struct Args {
    /// Config file
    #[clap(short, long, default_value = "retroemu.yaml")]
    config: PathBuf,

    /// Workspace directory, overriding the config file
    #[clap(short, long)]
    workspace: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Compile and run a source file from the workspace
    Run {
        file: String,
        /// Engine name, guessed from the extension when omitted
        #[clap(short, long)]
        engine: Option<String>,
    },
    /// Compile a source file from the workspace
    Compile {
        file: String,
        #[clap(short, long)]
        engine: Option<String>,
    },
    /// List workspace files
    List,
    /// Write a sample program into the workspace
    Sample { engine: String, name: String },
    /// Show engine usage
    Help { engine: Option<String> },
    /// Read commands from stdin
    Shell,
}

fn main() {
    use clap::Parser;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Args = Args::parse();
    let success = match run(args) {
        Ok(success) => success,
        Err(e) => {
            cprintln!("<r,s>error</>: {}", e);
            false
        }
    };
    if !success {
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<bool, Error> {
    let mut config = Config::load(&args.config)?;
    if let Some(workspace) = args.workspace {
        config.workspace = workspace;
    }
    let mut emu = Emulator::new(config);

    match args.command {
        Command::Run { file, engine } => {
            select(&mut emu, &file, engine.as_deref())?;
            let source = emu.load_file(&file)?;
            let report = emu.compile_and_execute(&source)?;
            println!("{}", report.text);
            Ok(report.success)
        }
        Command::Compile { file, engine } => {
            select(&mut emu, &file, engine.as_deref())?;
            let source = emu.load_file(&file)?;
            let report = emu.compile(&source)?;
            println!("{}", report.text);
            Ok(report.success)
        }
        Command::List => {
            for file in emu.list_files()? {
                println!("{:<24} {:>8}  {:>10}  {}", file.name, file.size, file.modified, file.extension);
            }
            Ok(true)
        }
        Command::Sample { engine, name } => {
            let kind = EngineKind::parse(&engine)?;
            emu.create_sample(kind, &name)?;
            cprintln!("<g>Created</> {}.{}", name.to_ascii_lowercase(), kind.extension());
            Ok(true)
        }
        Command::Help { engine } => {
            let kind = engine.as_deref().map(EngineKind::parse).transpose()?;
            println!("{}", emu.help(kind));
            Ok(true)
        }
        Command::Shell => repl(&mut emu),
    }
}

fn select(emu: &mut Emulator, file: &str, engine: Option<&str>) -> Result<(), Error> {
    let kind = match engine {
        Some(name) => EngineKind::parse(name)?,
        None => EngineKind::from_path(Path::new(file)).ok_or_else(|| Error::UnknownEngine(file.to_string()))?,
    };
    println!("{}", emu.initialize(kind));
    Ok(())
}

fn repl(emu: &mut Emulator) -> Result<bool, Error> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        match shell::command(emu, &line?) {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => println!("{text}"),
            Err(e) => cprintln!("<r,s>error</>: {}", e),
        }
        print!("> ");
        stdout.flush()?;
    }
    Ok(true)
}
