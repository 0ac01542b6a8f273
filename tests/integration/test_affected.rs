//! Integration tests for the package listing itself

use crate::helpers::{FakeModule, LOGRUS, MODULE, package};
use anyhow::Result;

#[test]
fn test_affected_basic() -> Result<()> {
  let module = FakeModule::scenario()?;

  let out = module.run(&[LOGRUS])?;

  assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
  assert_eq!(out.lines(), vec![MODULE, "example.com/test/lib"]);
  Ok(())
}

#[test]
fn test_affected_with_tests() -> Result<()> {
  let module = FakeModule::scenario()?;

  let out = module.run(&["--test", LOGRUS])?;

  assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
  assert_eq!(out.lines(), vec![MODULE, "example.com/test/lib", "example.com/test/tools"]);
  assert_eq!(
    module.calls()?,
    vec!["list -json ./...", "list -json -deps -test ./..."]
  );
  Ok(())
}

#[test]
fn test_affected_without_tests_skips_test_flag() -> Result<()> {
  let module = FakeModule::scenario()?;

  module.run(&[LOGRUS])?;

  assert_eq!(module.calls()?, vec!["list -json ./...", "list -json -deps ./..."]);
  Ok(())
}

#[test]
fn test_affected_roots() -> Result<()> {
  let module = FakeModule::scenario()?;

  let out = module.run(&["--roots", LOGRUS])?;
  assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
  assert_eq!(out.lines(), vec![MODULE]);

  let out = module.run(&["--roots", "--test", LOGRUS])?;
  assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
  assert_eq!(out.lines(), vec![MODULE, "example.com/test/tools"]);
  Ok(())
}

#[test]
fn test_affected_json_output() -> Result<()> {
  let module = FakeModule::scenario()?;

  let out = module.run(&["--json", LOGRUS])?;

  assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
  assert!(out.stdout.ends_with("]\n"), "JSON output should end with a newline: {:?}", out.stdout);
  let packages: Vec<String> = serde_json::from_str(&out.stdout)?;
  assert_eq!(packages, vec![MODULE, "example.com/test/lib"]);
  Ok(())
}

#[test]
fn test_json_and_text_agree() -> Result<()> {
  let module = FakeModule::scenario()?;

  for flags in [&[][..], &["--test"][..], &["--roots"][..], &["--roots", "--test"][..]] {
    let mut text_args = flags.to_vec();
    text_args.push(LOGRUS);
    let mut json_args = text_args.clone();
    json_args.insert(0, "--json");

    let text = module.run(&text_args)?;
    let json = module.run(&json_args)?;

    let from_json: Vec<String> = serde_json::from_str(&json.stdout)?;
    let from_text: Vec<String> = text.lines().into_iter().map(String::from).collect();
    assert_eq!(from_json, from_text, "flags: {:?}", flags);
  }
  Ok(())
}

#[test]
fn test_no_dependents_exits_one() -> Result<()> {
  let module = FakeModule::scenario()?;

  for args in [&["github.com/unknown/module"][..], &["--json", "--test", "github.com/unknown/module"][..]] {
    let out = module.run(args)?;
    assert_eq!(out.code, Some(1), "args: {:?}", args);
    assert!(out.stdout.is_empty(), "no output expected, got: {}", out.stdout);
  }
  Ok(())
}

#[test]
fn test_indirect_module_dependency() -> Result<()> {
  let module = FakeModule::scenario()?;

  // logrus pulls in x/sys, so the same packages are affected
  let out = module.run(&["golang.org/x/sys"])?;

  assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
  assert_eq!(out.lines(), vec![MODULE, "example.com/test/lib"]);
  Ok(())
}

#[test]
fn test_dependency_tests_do_not_propagate() -> Result<()> {
  let module = FakeModule::new()?;
  module.set_targets(&["example.com/app"])?;
  module.set_graph(
    &[
      package("example.com/app", "example.com/app", &["example.com/dep"], &[], &[]),
      // dep only needs logrus for its own tests
      package("example.com/dep", "example.com/dep", &[], &[LOGRUS], &[LOGRUS]),
      package(LOGRUS, LOGRUS, &[], &[], &[]),
    ]
    .join("\n"),
  )?;

  let out = module.run(&["--test", LOGRUS])?;

  assert_eq!(out.code, Some(1));
  assert!(out.stdout.is_empty());
  Ok(())
}

#[test]
fn test_import_cycle_terminates() -> Result<()> {
  let module = FakeModule::new()?;
  module.set_targets(&["example.com/a", "example.com/b"])?;
  module.set_graph(
    &[
      package("example.com/a", "example.com", &["example.com/b", LOGRUS], &[], &[]),
      package("example.com/b", "example.com", &["example.com/a", LOGRUS], &[], &[]),
      package(LOGRUS, LOGRUS, &[], &[], &[]),
    ]
    .join("\n"),
  )?;

  let out = module.run(&[LOGRUS])?;
  assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
  assert_eq!(out.lines(), vec!["example.com/a", "example.com/b"]);

  // Both import each other, so neither is a root; still a successful run
  let out = module.run(&["--roots", LOGRUS])?;
  assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
  assert!(out.stdout.is_empty());
  Ok(())
}
