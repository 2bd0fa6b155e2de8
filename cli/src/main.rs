mod normalize;
mod test_runner;

use std::io::{Read, Write};
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pipeline::{Pipeline, registry};

const SUBCOMMANDS: &[&str] = &["render", "test", "help"];

#[derive(Parser)]
#[command(name = "sectional", version, about = "Markdown to HTML with nested sections")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a Markdown file to HTML
    Render(RenderArgs),

    /// Run .test.md test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Markdown source file, or `-` for stdin
    #[arg(default_value = "-")]
    file: String,

    /// Extensions to enable, `_`-joined (e.g. `sections_pipetables`)
    #[arg(short, long, env = "SECTIONAL_EXTENSIONS", default_value = "sections")]
    extensions: String,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Print the nested block outline instead of HTML
    #[arg(long)]
    outline: bool,

    /// List registered extensions and exit
    #[arg(long)]
    list_extensions: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    // `sectional file.md` works like `sectional render file.md`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|p| p + 1)
    {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "render".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Render(render_args) => do_render(render_args),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn do_render(args: RenderArgs) {
    if args.list_extensions {
        for name in registry::global().names() {
            println!("{}", name);
        }
        return;
    }

    let pipeline = match Pipeline::from_spec(&args.extensions) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let source = match read_source(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let rendered = if args.outline {
        pipeline.parse(&source).to_string()
    } else {
        pipeline.render(&source)
    };

    let written = match &args.output {
        Some(path) => std::fs::write(path, &rendered),
        None => std::io::stdout().lock().write_all(rendered.as_bytes()),
    };
    if let Err(e) = written {
        let target = args.output.as_deref().unwrap_or("stdout");
        eprintln!("error: cannot write '{}': {}", target, e);
        process::exit(1);
    }
}

fn read_source(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(file)
    }
}
