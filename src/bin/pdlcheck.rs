//! PDL Model Checker - Command Line Interface
//!
//! Loads a Kripke model from a file (explicit matrix or symbolic form) or synthesizes a
//! random one, then evaluates PDL formulas against it: formulas from the command line,
//! the file's embedded TESTS, or an interactive loop.

use clap::Parser;
use pdl_checker::{Formula, Model};
use reedline::{DefaultPrompt, Reedline, Signal};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "pdlcheck")]
#[command(about = "Symbolic PDL model checker over finite Kripke structures", long_about = None)]
#[command(version)]
struct Args {
    /// Input model file (symbolic format unless --explicit is given)
    #[arg(
        long,
        value_name = "FILENAME",
        conflicts_with = "random",
        required_unless_present = "random"
    )]
    file: Option<PathBuf>,

    /// Interpret the input file as the explicit (matrix) format
    #[arg(long, requires = "file")]
    explicit: bool,

    /// Generate a random explicit model of the given size
    #[arg(
        long,
        num_args = 3,
        value_names = ["NUM_STATES", "NUM_PROPS", "NUM_PROGRAMS"],
        conflicts_with = "file"
    )]
    random: Option<Vec<usize>>,

    /// Run the tests embedded in the model file
    #[arg(long = "T", requires = "file", conflicts_with = "formula")]
    tests: bool,

    /// Evaluate a single formula and exit
    #[arg(long, value_name = "FORMULA")]
    formula: Option<String>,

    /// Return the truth vector for all states
    #[arg(long, conflicts_with_all = ["state", "printbdd"])]
    vector: bool,

    /// Evaluate in a specific state, given as a boolean valuation of the propositions
    #[arg(long, value_name = "VALUATION", conflicts_with = "printbdd")]
    state: Option<String>,

    /// Write the resulting BDD to a Graphviz file instead of printing
    #[arg(long)]
    printbdd: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (model, output_stem) = match build_model(&args) {
        Ok(built) => built,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };

    match find_tests(&model, &args) {
        Some(tests) => {
            let mut all_passed = true;
            for test in &tests {
                all_passed &= run_test(test, &model, &args, &output_stem);
            }
            if !all_passed {
                process::exit(1);
            }
        }
        None => interactive_loop(&model, &args, &output_stem),
    }
}

/// Load or synthesize the model, returning it with the stem used for dump files
fn build_model(args: &Args) -> Result<(Model, String), String> {
    if let Some(sizes) = &args.random {
        let (num_states, num_props, num_programs) = (sizes[0], sizes[1], sizes[2]);
        let start = Instant::now();
        let model = Model::random(&mut rand::thread_rng(), num_states, num_props, num_programs)
            .map_err(|e| e.to_string())?;
        println!(
            "Random model with {} states, {} propositions and {} programs created in {:.3e} seconds",
            num_states,
            num_props,
            num_programs,
            start.elapsed().as_secs_f64()
        );
        return Ok((model, "random".to_string()));
    }

    let path = args.file.as_ref().expect("clap requires --file or --random");
    let start = Instant::now();
    let model = if args.explicit {
        Model::from_explicit_file(path).map_err(|e| e.to_string())?
    } else {
        let (model, renames) = Model::from_symbolic_file(path).map_err(|e| e.to_string())?;
        for rename in &renames {
            println!("Note: variable {} replaced with {}", rename.from, rename.to);
        }
        model
    };
    println!(
        "Model from {} created in {:.3e} seconds",
        path.display(),
        start.elapsed().as_secs_f64()
    );

    let stem = path.with_extension("").display().to_string();
    Ok((model, stem))
}

/// The formulas to evaluate, or `None` to enter the interactive loop
fn find_tests(model: &Model, args: &Args) -> Option<Vec<String>> {
    if let Some(formula) = &args.formula {
        Some(vec![formula.clone()])
    } else if args.tests {
        Some(model.file_tests().to_vec())
    } else {
        None
    }
}

/// Evaluate one formula and print the outcome; returns whether it succeeded
fn run_test(test: &str, model: &Model, args: &Args, output_stem: &str) -> bool {
    let formula = match Formula::parse(test) {
        Ok(formula) => formula,
        Err(e) => {
            println!("Unable to test {}: {}", test, e);
            return false;
        }
    };

    if args.printbdd {
        let file_name = dump_file_name(output_stem, test);
        let start = Instant::now();
        match model.check_dump(&formula, &file_name) {
            Ok(()) => {
                println!(
                    "Result successfully exported to {} in {:.3e} seconds",
                    file_name,
                    start.elapsed().as_secs_f64()
                );
                true
            }
            Err(e) => {
                println!("Unable to export result to file: {}", e);
                false
            }
        }
    } else if let Some(state) = &args.state {
        let start = Instant::now();
        match model.check_in_state(&formula, state) {
            Ok(result) => {
                println!("Test: {}", test);
                println!("In state: {}", state);
                println!("Result: {}", result);
                println!("Time: {:.3e}\n", start.elapsed().as_secs_f64());
                true
            }
            Err(e) => {
                println!("Unable to test {} in state {}: {}", test, state, e);
                false
            }
        }
    } else if args.vector || model.states().is_some() {
        let start = Instant::now();
        match model.check_vector(&formula) {
            Ok(result) => {
                println!("Test: {}", test);
                println!("Result: {:?}", result);
                println!("Time: {:.3e}\n", start.elapsed().as_secs_f64());
                true
            }
            Err(e) => {
                println!("Unable to test {}: {}", test, e);
                false
            }
        }
    } else {
        // Symbolic models have no state list; print the satisfying set as an expression
        let start = Instant::now();
        match model.check(&formula) {
            Ok(result) => {
                println!("Test: {}", test);
                println!("Result: {}", result.to_expr_string());
                println!("Time: {:.3e}\n", start.elapsed().as_secs_f64());
                true
            }
            Err(e) => {
                println!("Unable to test {}: {}", test, e);
                false
            }
        }
    }
}

/// Dump path for a formula: input stem plus the formula with operator characters
/// mapped to ASCII tokens
fn dump_file_name(output_stem: &str, test: &str) -> String {
    let mut sanitized: String = test.split_whitespace().collect();
    for (from, to) in [
        ("<->", "_eqv_"),
        ("->", "_to_"),
        ("<", "_lt_"),
        (">", "_gt_"),
        ("[", "_lb_"),
        ("]", "_rb_"),
        (";", "_seq_"),
        ("U", "_u_"),
        ("*", "_star_"),
        ("?", "_test_"),
        ("!", "_not_"),
        ("&", "_and_"),
        ("|", "_or_"),
        ("(", ""),
        (")", ""),
    ] {
        sanitized = sanitized.replace(from, to);
    }
    format!("{}_{}.dot", output_stem, sanitized)
}

const HELP_TEXT: &str = "Compound formulas and programs must always be between parentheses\n\
    EXAMPLE: <a;(bUc)>(p->q)\n\n\
    Formula Operators:\n\
    Diamond = <a>p\n\
    Box = [a]p\n\
    Negation = !p\n\
    Logical AND = &\n\
    Logical OR = |\n\
    Implication = ->\n\
    Biconditional = <->\n\n\
    Program Operators:\n\
    Test = p?\n\
    Kleene star = a*\n\
    Composition = ;\n\
    Union = U\n";

/// Read formulas interactively until the user quits
///
/// Query errors are printed and the loop continues; only the quit commands (or EOF)
/// leave it.
fn interactive_loop(model: &Model, args: &Args, output_stem: &str) {
    println!(
        "Loaded model: propositions [{}], programs [{}]",
        model.prop_names_listed(),
        model.program_names_listed()
    );
    println!("Enter a PDL formula (or type 'h' for help, 'q' to quit)");

    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::default();

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }
                match input.to_lowercase().as_str() {
                    "h" => println!("{}", HELP_TEXT),
                    "q" | "quit" | "stop" => {
                        println!("Stopping");
                        break;
                    }
                    _ => {
                        run_test(input, model, args, output_stem);
                    }
                }
            }
            Ok(Signal::CtrlC) | Ok(Signal::CtrlD) => {
                println!("Stopping");
                break;
            }
            Err(e) => {
                eprintln!("Error: {:?}", e);
                break;
            }
        }
    }
}
