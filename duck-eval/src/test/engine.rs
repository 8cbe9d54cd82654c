use super::{context, exec_all, toks};
use crate::{Flow, Unit, EXECUTING};
use duck_base::{ErrorKind, Result};
use duck_lang::{Kind, TypedValue};
use std::time::{Duration, Instant};
use test_log::test;

#[test]
fn test_empty_and_operand_statements_are_noops() -> Result<()> {
    let (ctx, out) = context("");
    let mut unit = Unit::new(ctx.clone());
    assert_eq!(unit.execute(&[], 0)?, Flow::Next);
    assert_eq!(unit.execute(&toks("hello world"), 0)?, Flow::Next);
    assert_eq!(unit.execute(&toks("+ 1 2"), 0)?, Flow::Next);
    assert_eq!(out.contents(), "");
    Ok(())
}

#[test]
fn test_print_has_no_newline() -> Result<()> {
    let (ctx, out) = context("");
    exec_all(&ctx, r"print 'a'; print 'b\n'; print")?;
    assert_eq!(out.contents(), "ab\n");
    Ok(())
}

#[test]
fn test_print_arithmetic() -> Result<()> {
    let (ctx, out) = context("");
    exec_all(&ctx, "set a = 4; set b = 5; print a + b * 2; print 'x' + 1")?;
    assert_eq!(out.contents(), "14x");
    Ok(())
}

#[test]
fn test_print_bad_arithmetic_is_fatal() {
    let (ctx, _) = context("");
    let e = exec_all(&ctx, "print 1 + 'x'").unwrap_err();
    assert!(matches!(e.kind(), ErrorKind::MalformedExpression { .. }));
}

#[test]
fn test_set_stores_result() -> Result<()> {
    let (ctx, _) = context("");
    exec_all(&ctx, "set x = 2 * 3 + 1; set s = 'a' + 1; set u = nothing")?;
    assert_eq!(ctx.symbol("x"), Some(TypedValue::integer(7)));
    assert_eq!(ctx.symbol("s"), Some(TypedValue::string("a")));
    assert_eq!(ctx.symbol("u"), Some(TypedValue::null("nothing")));
    Ok(())
}

#[test]
fn test_set_requires_assignment_operator() {
    let (ctx, _) = context("");
    let e = exec_all(&ctx, "set x + 1").unwrap_err();
    assert_eq!(
        e.kind(),
        &ErrorKind::InvalidAssignmentOperator { found: "ADD".into() }
    );
    let e = exec_all(&ctx, "set x").unwrap_err();
    assert_eq!(
        e.kind(),
        &ErrorKind::InvalidAssignmentOperator { found: "".into() }
    );
    let e = exec_all(&ctx, "set x =").unwrap_err();
    assert!(matches!(e.kind(), ErrorKind::MalformedExpression { .. }));
}

#[test]
fn test_case_runs_body_when_true() -> Result<()> {
    let (ctx, out) = context("");
    exec_all(
        &ctx,
        "case 1 < 2 : print 'yes'; case 2 < 1 : print 'no'; case 1 == 1 print 'nothen'",
    )?;
    assert_eq!(out.contents(), "yes");
    Ok(())
}

#[test]
fn test_case_uses_first_then() -> Result<()> {
    let (ctx, out) = context("");
    exec_all(&ctx, "case 1 == 1 : case 2 == 3 : print 'inner'")?;
    assert_eq!(out.contents(), "");
    Ok(())
}

#[test]
fn test_sleep() -> Result<()> {
    let (ctx, out) = context("");
    let start = Instant::now();
    exec_all(&ctx, "sleep 30")?;
    assert!(start.elapsed() >= Duration::from_millis(30));
    let start = Instant::now();
    exec_all(&ctx, "set d = 5000; sleep d; sleep soon; sleep -5; sleep")?;
    assert!(start.elapsed() < Duration::from_millis(5000));
    assert_eq!(out.contents(), "");
    Ok(())
}

#[test]
fn test_finished_threads_released() -> Result<()> {
    let (ctx, _) = context("");
    for _ in 0..50 {
        exec_all(&ctx, "thread set t = 1")?;
    }
    std::thread::sleep(Duration::from_millis(200));
    exec_all(&ctx, "thread set t = 2")?;
    assert_eq!(ctx.pending_threads(), 1);
    ctx.join_threads();
    assert_eq!(ctx.pending_threads(), 0);
    Ok(())
}

#[test]
fn test_exit_and_end_clear_flags() -> Result<()> {
    let (ctx, _) = context("");
    ctx.set_flag("L", true);
    exec_all(&ctx, "end L")?;
    assert!(!ctx.flag("L"));
    assert!(ctx.flag(EXECUTING));
    exec_all(&ctx, "exit")?;
    assert!(!ctx.flag(EXECUTING));
    Ok(())
}

#[test]
fn test_goto_unknown_label_is_silent() -> Result<()> {
    let (ctx, out) = context("");
    let mut unit = Unit::new(ctx.clone());
    assert_eq!(unit.execute(&toks("goto nowhere"), 0)?, Flow::Next);
    assert_eq!(unit.execute(&toks("goto"), 0)?, Flow::Next);
    assert!(!ctx.flag("nowhere"));
    assert_eq!(out.contents(), "");
    Ok(())
}

#[test]
fn test_input_assigns_and_classifies() -> Result<()> {
    let (ctx, out) = context("42\n  spaced words  \n");
    exec_all(&ctx, "input 'n? ' = n; input '' = s; input 'eof' = e")?;
    assert_eq!(out.contents(), "n? eof");
    assert_eq!(ctx.symbol("n"), Some(TypedValue::string("42")));
    assert_eq!(crate::resolve_text(&ctx, "n"), TypedValue::integer(42));
    assert_eq!(ctx.symbol("s"), Some(TypedValue::string("spaced words")));
    assert_eq!(ctx.symbol("e"), Some(TypedValue::string("")));
    Ok(())
}

#[test]
fn test_input_without_target_discards() -> Result<()> {
    let (ctx, _) = context("ignored\nkept\n");
    exec_all(&ctx, "input; input '' = k")?;
    assert_eq!(ctx.symbol("k"), Some(TypedValue::string("kept")));
    Ok(())
}

#[test]
fn test_input_bad_operator() {
    let (ctx, _) = context("x\n");
    let e = exec_all(&ctx, "input 'p' + k").unwrap_err();
    assert_eq!(
        e.kind(),
        &ErrorKind::InvalidAssignmentOperator { found: "ADD".into() }
    );
}

#[cfg(unix)]
#[test]
fn test_invoke_captures_output() -> Result<()> {
    let (ctx, _) = context("");
    exec_all(&ctx, "invoke 'echo hi' = y; set cmd = 'echo 7'; invoke cmd = n")?;
    let y = crate::resolve_text(&ctx, "y");
    assert_eq!(y.kind, Kind::String);
    assert_eq!(y.text, "hi");
    assert_eq!(crate::resolve_text(&ctx, "n"), TypedValue::integer(7));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_invoke_without_target_does_not_wait() -> Result<()> {
    let (ctx, _) = context("");
    let start = Instant::now();
    exec_all(&ctx, "invoke 'sleep 2'")?;
    assert!(start.elapsed() < Duration::from_secs(1));
    Ok(())
}

#[test]
fn test_invoke_missing_program() -> Result<()> {
    let (ctx, out) = context("");
    exec_all(
        &ctx,
        "invoke 'no-such-duck-program-xyz' = r; invoke 'no-such-duck-program-xyz'; invoke ''",
    )?;
    assert_eq!(ctx.symbol("r"), Some(TypedValue::string("")));
    assert_eq!(out.contents(), "");
    Ok(())
}

#[test]
fn test_invoke_bad_operator() {
    let (ctx, _) = context("");
    let e = exec_all(&ctx, "invoke 'echo hi' y").unwrap_err();
    assert_eq!(
        e.kind(),
        &ErrorKind::InvalidAssignmentOperator { found: "y".into() }
    );
}

#[test]
fn test_thread_shares_symbols() -> Result<()> {
    let (ctx, _) = context("");
    exec_all(&ctx, "set base = 40; thread set t = base + 2")?;
    ctx.join_threads();
    assert_eq!(ctx.symbol("t"), Some(TypedValue::integer(42)));
    Ok(())
}

#[test]
fn test_thread_error_stays_in_thread() -> Result<()> {
    let (ctx, out) = context("");
    exec_all(&ctx, "thread set x + 1; print 'main'")?;
    ctx.join_threads();
    assert_eq!(out.contents(), "main");
    assert_eq!(ctx.symbol("x"), None);
    Ok(())
}
