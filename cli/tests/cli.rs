use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn sectional(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sectional"))
        .args(args)
        .env_remove("SECTIONAL_EXTENSIONS")
        .output()
        .expect("failed to run sectional")
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create dirs");
    }
    fs::write(&path, contents).expect("failed to write file");
    path
}

fn suite_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("suite")
}

#[test]
fn render_defaults_to_sections() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_file(dir.path(), "doc.md", "# foo\n## foo\n### foo\n");

    let output = sectional(&["render", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<h1>foo</h1>\n<section>\n<h2>foo</h2>\n<section>\n<h3>foo</h3>\n</section>\n</section>\n"
    );
}

#[test]
fn bare_file_argument_means_render() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_file(dir.path(), "doc.md", "plain text\n");

    let output = sectional(&[input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "<p>plain text</p>\n");
}

#[test]
fn commonmark_extension_renders_flat() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_file(dir.path(), "doc.md", "# a\ntext\n");

    let output = sectional(&["render", "-e", "commonmark", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "<h1>a</h1>\n<p>text</p>\n");
}

#[test]
fn extensions_fall_back_to_environment() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_file(dir.path(), "doc.md", "# a\ntext\n");

    let output = Command::new(env!("CARGO_BIN_EXE_sectional"))
        .args(["render", input.to_str().unwrap()])
        .env("SECTIONAL_EXTENSIONS", "commonmark")
        .output()
        .expect("failed to run sectional");
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("<section>"));
}

#[test]
fn unknown_extension_fails() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_file(dir.path(), "doc.md", "# a\n");

    let output = sectional(&["render", "-e", "sections_bogus", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown extension `bogus`"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let missing = dir.path().join("nope.md");

    let output = sectional(&["render", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}

#[test]
fn output_flag_writes_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_file(dir.path(), "doc.md", "# a\ntext\n");
    let out = dir.path().join("doc.html");

    let output = sectional(&[
        "render",
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "<h1>a</h1>\n<section>\n<p>text</p>\n</section>\n"
    );
}

#[test]
fn outline_shows_nesting() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let input = write_file(dir.path(), "doc.md", "# a\ntext\n## b\nmore\n");

    let output = sectional(&["render", "--outline", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "# a\n<section> (level 1)\n  paragraph\n  ## b\n  <section> (level 2)\n    paragraph\n"
    );
}

#[test]
fn list_extensions_prints_builtins() {
    let output = sectional(&["render", "--list-extensions"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout.lines().collect();
    assert!(names.contains(&"sections"));
    assert!(names.contains(&"commonmark"));
    assert!(names.contains(&"all"));
}

#[test]
fn bundled_suite_passes() {
    let output = sectional(&["--no-color", "test", suite_dir().to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "suite failed:\n{}", stderr);
    assert!(stderr.contains("test result: ok."));
}

#[test]
fn suite_category_filter() {
    let output = sectional(&[
        "--no-color",
        "test",
        suite_dir().to_str().unwrap(),
        "--category",
        "errors",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "suite failed:\n{}", stderr);
    assert!(stderr.contains("test result: ok. 1 passed, 0 failed"));
}

#[test]
fn failing_test_file_reports_mismatch() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let file = write_file(
        dir.path(),
        "wrong.test.md",
        "---\nextensions = \"sections\"\nexpect_html = \"<h1>a</h1>\"\n---\n# a\ntext\n",
    );

    let output = sectional(&["--no-color", "test", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FAIL"));
    assert!(stderr.contains("output mismatch"));
}

#[test]
fn bad_frontmatter_is_reported_with_location() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    write_file(dir.path(), "broken/bad.test.md", "---\nextensions = \n---\n# a\n");
    write_file(
        dir.path(),
        "ok/good.test.md",
        "---\nexpect_html = \"<p>x</p>\"\n---\nx\n",
    );

    let output = sectional(&["--no-color", "test", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frontmatter error"), "stderr: {}", stderr);
    assert!(stderr.contains("invalid test frontmatter"), "stderr: {}", stderr);
    assert!(stderr.contains("1 passed, 1 failed"), "stderr: {}", stderr);
}
