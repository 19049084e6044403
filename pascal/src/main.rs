use color_print::{cformat, cprintln};
use tpas::{Compilation, Limits};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.pas")]
    input: String,

    /// Only compile, do not run
    #[clap(short, long)]
    check_only: bool,

    /// Maximum number of interpreter steps
    #[clap(long)]
    steps: Option<usize>,

    /// Print results as YAML
    #[clap(long)]
    yaml: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            cprintln!("<r,s>Failed to open File</>: {} ({})", args.input, e);
            std::process::exit(1);
        }
    };

    let compilation = tpas::compile(&source);
    let limits = Limits {
        max_steps: args.steps.unwrap_or(Limits::default().max_steps),
    };
    let run = !args.check_only && compilation.success;

    if args.yaml {
        print_yaml(&compilation, run.then(|| tpas::execute_with(&compilation, &limits)));
        std::process::exit(if compilation.success { 0 } else { 1 });
    }

    println!("{}", tpas::display_header());
    println!("1. Compile {}", args.input);

    let lines: Vec<&str> = source.lines().collect();
    for error in &compilation.errors {
        error.print_diag(&args.input, &lines);
    }
    println!("{}", tpas::display_results(&compilation));

    if !compilation.success {
        cprintln!("<r,s>Compilation failed</>: {} error(s)", compilation.errors.len());
        std::process::exit(1);
    }

    if run {
        println!("2. Execute (max {} steps)", limits.max_steps);
        let exec = tpas::execute_with(&compilation, &limits);
        println!("{}", tpas::display_execution_results(&exec));
        if !exec.success {
            std::process::exit(1);
        }
    }
}

fn print_yaml(compilation: &Compilation, exec: Option<tpas::Execution>) {
    #[derive(serde::Serialize)]
    struct Output<'a> {
        compilation: &'a Compilation,
        #[serde(skip_serializing_if = "Option::is_none")]
        execution: Option<tpas::Execution>,
    }
    let output = Output {
        compilation,
        execution: exec,
    };
    match serde_yaml::to_string(&output) {
        Ok(text) => print!("{text}"),
        Err(e) => eprintln!("{}", cformat!("<r,s>Failed to serialize</>: {}", e)),
    }
}
