//! End-to-end tests of the chat → code → mesh pipeline through the harness.

use nfinit_gui_lib::driver;
use nfinit_gui_lib::fixtures::{cube_glb, fenced};
use nfinit_gui_lib::harness::TestHarness;
use nfinit_gui_lib::intent::Intent;
use nfinit_gui_lib::orchestrator::{GenerationStatus, Phase, Provenance};
use shared::ChatRole;

const CUBE_CODE: &str = "from build123d import *\nresult = Box(10, 10, 10)";

#[tokio::test]
async fn test_message_to_mesh() {
    let mut h = TestHarness::new();
    h.script_code(fenced(CUBE_CODE));
    h.script_mesh(cube_glb(0.01));

    assert!(h.send("make a 10mm cube").await);

    assert_eq!(h.source(), CUBE_CODE);
    assert_eq!(h.state.orchestrator.source().provenance, Provenance::Generated);
    assert_eq!(h.conversation_len(), 2);
    let turns = h.state.orchestrator.conversation();
    assert_eq!(turns[0].role, ChatRole::User);
    assert_eq!(turns[0].content, "make a 10mm cube");
    assert_eq!(turns[1].role, ChatRole::Assistant);
    assert_eq!(turns[1].content, CUBE_CODE);

    assert_eq!(h.status(), GenerationStatus::Idle);
    assert_eq!(h.promote_count(), 1);
    assert!(h.current_artifact().is_some());
    assert!(!h.state.model.is_placeholder());
    assert_eq!(h.state.model.triangle_count(), 12);

    // The mesh service received exactly the extracted program
    assert_eq!(h.scripted.mesh.calls(), vec![CUBE_CODE.to_string()]);
}

#[tokio::test]
async fn test_code_request_carries_history_code_and_model() {
    let mut h = TestHarness::new();
    h.script_code(fenced(CUBE_CODE));
    h.script_mesh(cube_glb(0.01));
    assert!(h.send("make a cube").await);

    h.state.set_model("deepseek/deepseek-v3.2");
    h.script_code(fenced("result = Box(20, 10, 10)"));
    h.script_mesh(cube_glb(0.02));
    assert!(h.send("twice as long").await);

    let requests = h.scripted.code.requests();
    assert_eq!(requests.len(), 2);
    let second = &requests[1];
    assert_eq!(second.messages.len(), 3);
    assert_eq!(second.messages[2].content, "twice as long");
    assert_eq!(second.code, CUBE_CODE);
    assert_eq!(second.model_id, "deepseek/deepseek-v3.2");
    assert_eq!(h.conversation_len(), 4);
    assert_eq!(h.promote_count(), 2);
}

#[tokio::test]
async fn test_code_failure_rolls_back_conversation() {
    let mut h = TestHarness::new();
    h.script_code(fenced(CUBE_CODE));
    h.script_mesh(cube_glb(0.01));
    assert!(h.send("make a cube").await);
    let before = h.conversation_len();
    let artifact = h.current_artifact();

    h.script_code_error("rate limited");
    assert!(h.send("add a hole").await);

    assert_eq!(h.conversation_len(), before);
    assert_eq!(h.status(), GenerationStatus::Failed("rate limited"));
    assert_eq!(h.source(), CUBE_CODE);
    assert_eq!(h.current_artifact(), artifact);
    // No mesh request was made for the failed turn
    assert_eq!(h.scripted.mesh.calls().len(), 1);
}

#[tokio::test]
async fn test_mesh_failure_keeps_code_and_previous_artifact() {
    let mut h = TestHarness::new();
    h.script_code(fenced(CUBE_CODE));
    h.script_mesh(cube_glb(0.01));
    assert!(h.send("make a cube").await);
    let artifact = h.current_artifact();

    h.script_code(fenced("result = Sphere(5)"));
    h.script_mesh_error("Execution failed: NameError");
    assert!(h.send("make it round").await);

    // The turn is kept: code generation itself succeeded
    assert_eq!(h.conversation_len(), 4);
    assert_eq!(h.source(), "result = Sphere(5)");
    assert_eq!(h.status(), GenerationStatus::Failed("Execution failed: NameError"));
    assert_eq!(h.current_artifact(), artifact);
    assert_eq!(h.promote_count(), 1);
}

#[tokio::test]
async fn test_undecodable_mesh_is_not_promoted() {
    let mut h = TestHarness::new();
    h.script_code(fenced(CUBE_CODE));
    h.script_mesh(b"not a glb at all".to_vec());

    assert!(h.send("make a cube").await);

    assert_eq!(h.promote_count(), 0);
    assert!(h.current_artifact().is_none());
    assert!(h.state.model.is_placeholder());
    match h.status() {
        GenerationStatus::Failed(msg) => assert!(msg.starts_with("Failed to load mesh"), "{msg}"),
        other => panic!("unexpected status {other:?}"),
    }
}

#[tokio::test]
async fn test_busy_rejects_second_request() {
    let mut h = TestHarness::new();
    let first = h.dispatch(Intent::Send("make a cube".into()));
    assert!(first.is_some());
    assert_eq!(h.status(), GenerationStatus::Generating(Phase::Code));

    assert!(h.dispatch(Intent::Send("and another".into())).is_none());
    assert!(h.dispatch(Intent::Generate).is_none());
    assert_eq!(h.conversation_len(), 1);
}

#[tokio::test]
async fn test_send_rejected_while_mesh_pending() {
    let mut h = TestHarness::new();
    h.script_code(fenced(CUBE_CODE));
    h.script_mesh(cube_glb(0.01));

    // Run only the code phase; hold the mesh request
    let code_effect = h.dispatch(Intent::Send("make a cube".into())).expect("accepted");
    let completion = driver::execute(code_effect, &h.scripted.collaborators)
        .await
        .expect("code completion");
    let mesh_effect = h.state.apply_completion(completion).expect("mesh follow-up");
    assert_eq!(h.status(), GenerationStatus::Generating(Phase::Mesh));

    let turns_before = h.state.orchestrator.conversation().to_vec();
    let source_before = h.state.orchestrator.source().clone();

    assert!(h.dispatch(Intent::Send("make it taller".into())).is_none());
    assert!(h.dispatch(Intent::Generate).is_none());

    assert_eq!(h.state.orchestrator.conversation(), &turns_before[..]);
    assert_eq!(h.state.orchestrator.source(), &source_before);
    assert_eq!(h.scripted.code.requests().len(), 1);
    assert_eq!(h.status(), GenerationStatus::Generating(Phase::Mesh));

    // The held request still lands normally
    h.run(mesh_effect).await;
    assert_eq!(h.status(), GenerationStatus::Idle);
    assert_eq!(h.promote_count(), 1);
    assert_eq!(h.conversation_len(), 2);
}

#[tokio::test]
async fn test_teardown_during_code_phase_drops_pending_turn() {
    let mut h = TestHarness::new();
    let effect = h.dispatch(Intent::Send("make a cube".into())).expect("accepted");
    assert_eq!(h.conversation_len(), 1);

    h.state.teardown();

    assert!(effect.cancel_token().is_cancelled());
    assert_eq!(h.conversation_len(), 0);
    assert_eq!(h.status(), GenerationStatus::Idle);
}

#[tokio::test]
async fn test_blank_message_rejected() {
    let mut h = TestHarness::new();
    assert!(!h.send("   \n").await);
    assert_eq!(h.conversation_len(), 0);
    assert_eq!(h.status(), GenerationStatus::Idle);
    assert!(h.scripted.code.requests().is_empty());
}

#[tokio::test]
async fn test_manual_generate_uses_edited_code() {
    let mut h = TestHarness::new();
    h.edit_code("result = Box(1, 2, 3)");
    assert_eq!(h.state.orchestrator.source().provenance, Provenance::UserEdited);
    h.script_mesh(cube_glb(0.01));

    assert!(h.generate().await);

    assert_eq!(h.scripted.mesh.calls(), vec!["result = Box(1, 2, 3)".to_string()]);
    assert_eq!(h.conversation_len(), 0);
    assert_eq!(h.promote_count(), 1);
}

#[tokio::test]
async fn test_generate_with_blank_code_rejected() {
    let mut h = TestHarness::new();
    h.edit_code("  ");
    assert!(!h.generate().await);
    assert!(h.scripted.mesh.calls().is_empty());
}

#[tokio::test]
async fn test_next_message_clears_previous_error() {
    let mut h = TestHarness::new();
    h.script_code_error("boom");
    assert!(h.send("first").await);
    assert!(h.state.orchestrator.last_error().is_some());

    let effect = h.dispatch(Intent::Send("second".into()));
    assert!(effect.is_some());
    assert!(h.state.orchestrator.last_error().is_none());
}

#[tokio::test]
async fn test_teardown_releases_artifact() {
    let mut h = TestHarness::new();
    h.script_code(fenced(CUBE_CODE));
    h.script_mesh(cube_glb(0.01));
    assert!(h.send("make a cube").await);
    assert_eq!(h.state.orchestrator.artifacts().live_count(), 1);

    h.state.teardown();

    assert_eq!(h.state.orchestrator.artifacts().live_count(), 0);
    assert_eq!(h.state.orchestrator.artifacts().release_count(), 1);
    assert!(h.current_artifact().is_none());
}
