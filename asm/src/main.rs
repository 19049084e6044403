use color_print::{cformat, cprintln};
use x86asm::{cpu::Limits, Assembly};

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
    #[clap(default_value = "main.asm")]
    input: String,

    /// Dump object code
    #[clap(short, long)]
    dump: bool,

    /// Run the program after assembling
    #[clap(short, long)]
    run: bool,

    /// Maximum number of executed instructions
    #[clap(short, long)]
    tmax: Option<usize>,

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

    let asm = x86asm::assemble(&source);
    let limits = Limits {
        max_steps: args.tmax.unwrap_or(Limits::default().max_steps),
    };

    if args.yaml {
        print_yaml(&asm, args.run.then(|| x86asm::execute_with(&asm, &limits)));
        std::process::exit(if asm.success { 0 } else { 1 });
    }

    println!("{}", x86asm::display_header());
    println!("1. Assemble {}", args.input);

    let lines: Vec<&str> = source.lines().collect();
    for warning in &asm.warnings {
        warning.print_diag(&args.input, &lines, true);
    }
    for error in &asm.errors {
        error.print_diag(&args.input, &lines, false);
    }

    if args.dump {
        println!("-----+--------------+-------------------------------------------------");
        for code in &asm.object_code {
            println!("{}", code.cformat());
        }
        println!("-----+--------------+-------------------------------------------------");
    } else {
        println!("{}", x86asm::display_results(&asm));
    }

    if !asm.success {
        cprintln!("<r,s>Assembly failed</>: {} error(s)", asm.errors.len());
        std::process::exit(1);
    }

    if args.run {
        println!("2. Execute (max {} instructions)", limits.max_steps);
        let exec = x86asm::execute_with(&asm, &limits);
        println!("{}", x86asm::display_execution_results(&exec));
    }
}

fn print_yaml(asm: &Assembly, exec: Option<x86asm::Execution>) {
    #[derive(serde::Serialize)]
    struct Output<'a> {
        assembly: &'a Assembly,
        #[serde(skip_serializing_if = "Option::is_none")]
        execution: Option<x86asm::Execution>,
    }
    match serde_yaml::to_string(&Output { assembly: asm, execution: exec }) {
        Ok(text) => print!("{text}"),
        Err(e) => eprintln!("{}", cformat!("<r,s>Failed to serialize</>: {}", e)),
    }
}
