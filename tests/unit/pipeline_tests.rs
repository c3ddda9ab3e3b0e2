//! Pipeline runner ordering and halt-on-failure semantics, verified with
//! instrumented steps that record their invocations.

use anyhow::bail;
use oceanup::pipeline::{self, Step, StepFuture};

#[derive(Default)]
struct Trace {
    ran: Vec<&'static str>,
}

fn step_a(cx: &mut Trace) -> StepFuture<'_> {
    Box::pin(async move {
        cx.ran.push("a");
        Ok(())
    })
}

fn step_b(cx: &mut Trace) -> StepFuture<'_> {
    Box::pin(async move {
        cx.ran.push("b");
        Ok(())
    })
}

fn step_boom(cx: &mut Trace) -> StepFuture<'_> {
    Box::pin(async move {
        cx.ran.push("boom");
        bail!("exploded")
    })
}

#[tokio::test]
async fn runs_every_step_in_declared_order() {
    let steps = vec![Step::new("a", step_a), Step::new("b", step_b)];
    let mut cx = Trace::default();
    pipeline::run(&steps, &mut cx).await.expect("pipeline should succeed");
    assert_eq!(cx.ran, vec!["a", "b"]);
}

#[tokio::test]
async fn halts_at_first_failure_and_skips_the_rest() {
    let steps = vec![
        Step::new("a", step_a),
        Step::new("boom", step_boom),
        Step::new("b", step_b),
    ];
    let mut cx = Trace::default();
    let err = pipeline::run(&steps, &mut cx).await.expect_err("pipeline should fail");
    assert_eq!(err.step, "boom");
    assert_eq!(cx.ran, vec!["a", "boom"], "steps after the failure must never run");
}

#[tokio::test]
async fn error_carries_the_failing_step_and_cause() {
    let steps = vec![Step::new("boom", step_boom)];
    let mut cx = Trace::default();
    let err = pipeline::run(&steps, &mut cx).await.expect_err("pipeline should fail");
    assert_eq!(err.to_string(), "step 'boom' failed");
    assert_eq!(err.source.to_string(), "exploded");
}

#[tokio::test]
async fn empty_pipeline_succeeds() {
    let steps: Vec<Step<Trace>> = Vec::new();
    let mut cx = Trace::default();
    pipeline::run(&steps, &mut cx).await.expect("empty pipeline should succeed");
    assert!(cx.ran.is_empty());
}
