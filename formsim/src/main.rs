use clap::Parser as ClapParser;
use formsim_compare::{
    compare_sources,
    ArityPolicy,
    CompareOptions,
    Comparison,
    ComparisonError,
    Side,
};
use formsim_compute::tree::Node;
use formsim_graph::{RenderError, TreeGraph};
use std::{io::{self, BufRead, IsTerminal}, path::{Path, PathBuf}, process::ExitCode};
use tracing::Level;

/// Compares two math formulas for structural similarity and algebraic equivalence.
///
/// With no formulas given, they are read from the first two non-empty lines of stdin.
#[derive(ClapParser)]
#[command(version)]
struct Arguments {
    /// The first formula.
    formula_a: Option<String>,

    /// The second formula.
    formula_b: Option<String>,

    /// Write `formula_1.png` and `formula_2.png`, drawings of the parsed trees, to this directory.
    #[arg(long, value_name = "DIR")]
    render: Option<PathBuf>,

    /// With `--render`, also draw the simplified forms to `simplified_1.png` and
    /// `simplified_2.png`.
    #[arg(long, requires = "render")]
    render_simplified: bool,

    /// Count the extra operands of operators with different arity as mismatches.
    #[arg(long)]
    penalize_arity: bool,

    /// The prefix of the placeholder names given to variables.
    #[arg(long, default_value = "x")]
    prefix: String,

    /// The maximum amount of work the simplifier may do per formula.
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Log more; `-v` for debug output and `-vv` for trace output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Arguments {
    fn options(&self) -> CompareOptions {
        let arity = if self.penalize_arity {
            ArityPolicy::Penalize
        } else {
            ArityPolicy::Truncate
        };
        let options = CompareOptions::new().prefix(self.prefix.as_str()).arity(arity);
        match self.max_steps {
            Some(max_steps) => options.max_steps(max_steps),
            None => options,
        }
    }
}

/// Returns the two formulas to compare, from the arguments or from stdin.
fn read_formulas(args: &Arguments) -> Result<(String, String), String> {
    match (&args.formula_a, &args.formula_b) {
        (Some(a), Some(b)) => return Ok((a.clone(), b.clone())),
        (Some(_), None) => return Err("expected a second formula".to_string()),
        _ => (),
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err("expected two formulas, as arguments or on stdin".to_string());
    }

    let mut lines = Vec::with_capacity(2);
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| format!("could not read stdin: {}", err))?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
            if lines.len() == 2 {
                break;
            }
        }
    }

    let mut lines = lines.into_iter();
    match (lines.next(), lines.next()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err("expected two non-empty lines on stdin".to_string()),
    }
}

/// Draws both parsed trees, and the simplified forms if requested, to the given directory.
fn render(dir: &Path, comparison: &Comparison, simplified: bool) -> Result<(), RenderError> {
    std::fs::create_dir_all(dir)?;
    for (n, formula) in [(1, &comparison.first), (2, &comparison.second)] {
        TreeGraph::new(&formula.tree).write_png(dir.join(format!("formula_{}.png", n)))?;
        if simplified {
            let tree = Node::from(&formula.simplified);
            TreeGraph::new(&tree).write_png(dir.join(format!("simplified_{}.png", n)))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Arguments::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let (a, b) = match read_formulas(&args) {
        Ok(formulas) => formulas,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::FAILURE;
        },
    };

    let comparison = match compare_sources(&a, &b, &args.options()) {
        Ok(comparison) => comparison,
        Err(ComparisonError::Parse { side, source }) => {
            let input = match side {
                Side::First => &a,
                Side::Second => &b,
            };
            if let Err(err) = source.report_to_stderr(&side.to_string(), input) {
                eprintln!("error: {}", err);
            }
            return ExitCode::FAILURE;
        },
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        },
    };

    print!("{}", comparison);

    if let Some(dir) = &args.render {
        if let Err(err) = render(dir, &comparison, args.render_simplified) {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
        tracing::info!(dir = %dir.display(), "rendered trees");
    }

    ExitCode::SUCCESS
}
