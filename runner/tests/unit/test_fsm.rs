//! Job phase machine unit tests

use deploy_runner::controller::fsm::{JobFsm, JobPhase};

#[test]
fn test_initial_phase() {
    let fsm = JobFsm::new();
    assert_eq!(fsm.phase(), JobPhase::Waiting);
}

#[test]
fn test_full_success_sequence() {
    let mut fsm = JobFsm::new();

    fsm.advance(JobPhase::Intake).unwrap();
    fsm.advance(JobPhase::NotifyPending).unwrap();
    fsm.advance(JobPhase::Executing).unwrap();
    fsm.advance(JobPhase::Classifying).unwrap();
    fsm.advance(JobPhase::Reporting).unwrap();
    fsm.advance(JobPhase::Billing).unwrap();
    fsm.advance(JobPhase::Stopped).unwrap();

    assert_eq!(fsm.phase(), JobPhase::Stopped);
}

#[test]
fn test_billing_is_optional() {
    let mut fsm = JobFsm::new();

    fsm.advance(JobPhase::Intake).unwrap();
    fsm.advance(JobPhase::NotifyPending).unwrap();
    fsm.advance(JobPhase::Executing).unwrap();
    fsm.advance(JobPhase::Classifying).unwrap();
    fsm.advance(JobPhase::Reporting).unwrap();
    fsm.advance(JobPhase::Stopped).unwrap();

    assert_eq!(fsm.phase(), JobPhase::Stopped);
}

#[test]
fn test_failure_reachable_after_intake() {
    let mut fsm = JobFsm::new();
    fsm.advance(JobPhase::Intake).unwrap();
    fsm.advance(JobPhase::Failed).unwrap();
    assert_eq!(fsm.phase(), JobPhase::Failed);

    let mut fsm = JobFsm::new();
    fsm.advance(JobPhase::Intake).unwrap();
    fsm.advance(JobPhase::NotifyPending).unwrap();
    fsm.advance(JobPhase::Executing).unwrap();
    fsm.advance(JobPhase::Failed).unwrap();
    assert_eq!(fsm.phase(), JobPhase::Failed);
}

#[test]
fn test_failure_not_reachable_while_waiting() {
    let mut fsm = JobFsm::new();
    assert!(fsm.advance(JobPhase::Failed).is_err());
}

#[test]
fn test_terminal_phases_are_final() {
    let mut fsm = JobFsm::new();
    fsm.advance(JobPhase::Intake).unwrap();
    fsm.advance(JobPhase::Failed).unwrap();
    assert!(fsm.advance(JobPhase::Stopped).is_err());
    assert!(fsm.advance(JobPhase::Failed).is_err());
}

#[test]
fn test_illegal_jump() {
    let mut fsm = JobFsm::new();
    assert!(fsm.advance(JobPhase::Executing).is_err());
    assert_eq!(fsm.phase(), JobPhase::Waiting);
}
