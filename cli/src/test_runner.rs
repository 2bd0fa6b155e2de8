use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::Deserialize;

use pipeline::Pipeline;

use crate::normalize::normalize_html;

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// `_`-joined extension identifiers. Defaults to plain CommonMark.
    #[serde(default = "default_extensions")]
    pub extensions: String,

    /// Expected HTML, compared after normalization.
    #[serde(default)]
    pub expect_html: Option<String>,

    /// Expected pipeline construction error. Its message must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,
}

fn default_extensions() -> String {
    "commonmark".to_string()
}

/// A `.test.md` file whose frontmatter could not be read.
#[derive(Debug)]
struct FrontmatterError {
    message: String,
    /// Byte range in the whole file, when known.
    span: Option<Range<usize>>,
}

impl FrontmatterError {
    fn new(message: impl Into<String>) -> Self {
        FrontmatterError {
            message: message.into(),
            span: None,
        }
    }
}

/// Parse a `.test.md` file into its TOML config and Markdown source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), FrontmatterError> {
    let bom = if content.starts_with('\u{feff}') { '\u{feff}'.len_utf8() } else { 0 };
    let body = &content[bom..];

    if !body.starts_with("---") {
        return Err(FrontmatterError::new("missing opening --- frontmatter delimiter"));
    }

    let after_open = &body[3..];
    let toml_offset = content.len() - after_open.len();

    let close_pos = after_open
        .find("\n---")
        .ok_or_else(|| FrontmatterError::new("missing closing --- frontmatter delimiter"))?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig = toml::from_str(toml_str).map_err(|e| FrontmatterError {
        message: format!("TOML parse error: {}", e.message()),
        span: e.span().map(|s| s.start + toml_offset..s.end + toml_offset),
    })?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
    /// Source-located detail for the failure, rendered with the report.
    pub diagnostic: Option<(String, Diagnostic<usize>)>,
}

impl TestResult {
    fn fail(path: &Path, description: Option<String>, reason: String) -> Self {
        TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Fail(reason),
            diagnostic: None,
        }
    }
}

fn run_single_test(path: &Path) -> TestResult {
    // 1. Read file
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return TestResult::fail(path, None, format!("cannot read file: {}", e)),
    };

    // 2. Parse frontmatter
    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => {
            let mut result =
                TestResult::fail(path, None, format!("frontmatter error: {}", e.message));
            if let Some(span) = e.span {
                let diagnostic = Diagnostic::error()
                    .with_message("invalid test frontmatter")
                    .with_labels(vec![Label::primary(0, span).with_message(e.message)]);
                result.diagnostic = Some((content.clone(), diagnostic));
            }
            return result;
        }
    };

    let description = config.description.clone();
    tracing::debug!(path = %path.display(), extensions = %config.extensions, "Running test");

    // 3. Build the pipeline, checking expect_error
    let built = Pipeline::from_spec(&config.extensions);
    let pipeline = match (&config.expect_error, built) {
        (Some(expected), Err(err)) => {
            let err_str = err.to_string();
            return if err_str.contains(expected.as_str()) {
                TestResult {
                    path: path.to_path_buf(),
                    description,
                    outcome: TestOutcome::Pass,
                    diagnostic: None,
                }
            } else {
                TestResult::fail(
                    path,
                    description,
                    format!("expected error containing \"{}\", got: {}", expected, err_str),
                )
            };
        }
        (Some(expected), Ok(_)) => {
            return TestResult::fail(
                path,
                description,
                format!(
                    "expected error containing \"{}\", but the pipeline was built",
                    expected
                ),
            );
        }
        (None, Err(err)) => {
            return TestResult::fail(path, description, format!("unexpected error: {}", err));
        }
        (None, Ok(pipeline)) => pipeline,
    };

    // 4. Render and compare
    let actual = pipeline.render(source);
    if let Some(expected) = &config.expect_html {
        let expected = normalize_html(expected);
        let actual = normalize_html(&actual);
        if expected != actual {
            return TestResult::fail(
                path,
                description,
                format!("output mismatch\n  expected: {}\n  actual:   {}", expected, actual),
            );
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
        diagnostic: None,
    }
}

/// Discover `.test.md` files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
/// Returns a BTreeMap so categories are sorted alphabetically.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.md") {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn result_label(result: &TestResult) -> &str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_suffix(".test.md"))
            .unwrap_or("?")
    })
}

fn print_failure(result: &TestResult, no_color: bool) {
    eprintln!();
    eprintln!("  --- {} ---", result.path.display());
    if let TestOutcome::Fail(reason) = &result.outcome {
        for line in reason.lines() {
            eprintln!("  {}", line);
        }
    }
    if let Some((content, diagnostic)) = &result.diagnostic {
        let mut files = SimpleFiles::new();
        files.add(result.path.display().to_string(), content.clone());
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        let writer = StandardStream::stderr(color_choice);
        let config = term::Config::default();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, diagnostic);
    }
}

/// Run all `.test.md` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    // Single file mode: categories are ignored
    if path.is_file() {
        let result = run_single_test(path);
        let label = result_label(&result);
        return match &result.outcome {
            TestOutcome::Pass => {
                eprintln!("  {}  {}", pass_label(no_color), label);
                eprintln!();
                eprintln!("test result: {}. 1 passed, 0 failed", if no_color { "ok" } else { "\x1b[32mok\x1b[0m" });
                0
            }
            TestOutcome::Fail(_) => {
                eprintln!("  {}  {}", fail_label(no_color), label);
                eprintln!();
                eprintln!("failures:");
                print_failure(&result, no_color);
                eprintln!();
                eprintln!("test result: {}. 0 passed, 1 failed (of 1)",
                    if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" });
                1
            }
        };
    }

    let all_categories = discover_categorized(path);

    if all_categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return 1;
    }

    // Filter categories if specified
    let run_categories: BTreeMap<&str, &Vec<PathBuf>> = if categories.is_empty() {
        all_categories.iter().map(|(k, v)| (k.as_str(), v)).collect()
    } else {
        let mut filtered = BTreeMap::new();
        for requested in categories {
            let req = requested.trim_matches('/');
            let mut found = false;
            for (cat, files) in &all_categories {
                if cat == req || cat.starts_with(&format!("{}/", req)) {
                    filtered.insert(cat.as_str(), files);
                    found = true;
                }
            }
            if !found {
                eprintln!(
                    "warning: category '{}' not found (available: {})",
                    req,
                    all_categories
                        .keys()
                        .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        filtered
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_categories {
        let header = if cat.is_empty() {
            "(root)".to_string()
        } else {
            cat.to_string()
        };
        eprintln!();
        eprintln!("{}", bold(&header, no_color));

        for file in *files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), result_label(&result));
                }
                TestOutcome::Fail(_) => {
                    failed += 1;
                    eprintln!("  {}  {}", fail_label(no_color), result_label(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            print_failure(f, no_color);
        }
    }

    // Summary
    eprintln!();
    if failed == 0 {
        if no_color {
            eprintln!("test result: ok. {} passed, 0 failed", passed);
        } else {
            eprintln!("test result: \x1b[32mok\x1b[0m. {} passed, 0 failed", passed);
        }
        0
    } else {
        let total = passed + failed;
        if no_color {
            eprintln!(
                "test result: FAILED. {} passed, {} failed (of {})",
                passed, failed, total
            );
        } else {
            eprintln!(
                "test result: \x1b[31mFAILED\x1b[0m. {} passed, {} failed (of {})",
                passed, failed, total
            );
        }
        1
    }
}
