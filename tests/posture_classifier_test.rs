//! Tests for the per-frame posture classifier


use posture_monitor::{
    constants::{LEFT_EAR, LEFT_HIP, LEFT_SHOULDER, NOSE, RIGHT_EAR, RIGHT_HIP, RIGHT_SHOULDER},
    landmarks::Landmark,
    posture::{classify, FrameStatus, IssueKind},
};
use test_helpers::{frame_with, slouched_frame, upright_frame};

fn kinds(frame: &posture_monitor::landmarks::PoseFrame) -> Vec<IssueKind> {
    classify(frame)
        .expect("required landmarks present")
        .issues
        .iter()
        .map(|i| i.kind)
        .collect()
}

#[test]
fn test_classifier_is_deterministic() {
    let frame = slouched_frame();
    let first = classify(&frame).unwrap();
    let second = classify(&frame).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.measurements, second.measurements);
}

#[test]
fn test_good_posture_scenario() {
    let verdict = classify(&upright_frame()).unwrap();
    assert_eq!(verdict.status, FrameStatus::Good);
    assert!(verdict.issues.is_empty());
    assert!((verdict.measurements.shoulder_height_diff - 0.02).abs() < 1e-9);
    assert_eq!(verdict.measurements.forward_lean, 0.0);
    assert_eq!(verdict.measurements.nose_to_shoulder_dist, 0.0);
}

#[test]
fn test_uneven_shoulders_scenario() {
    let frame = frame_with(|p| p[RIGHT_SHOULDER].y = 0.50);
    let verdict = classify(&frame).unwrap();

    assert_eq!(verdict.status, FrameStatus::NeedsAttention);
    assert_eq!(verdict.issues.len(), 1);
    let issue = &verdict.issues[0];
    assert_eq!(issue.kind, IssueKind::UnevenShoulders);
    assert!((issue.severity - 1.5).abs() < 1e-9);
    assert_eq!(issue.message, "Level your shoulders");
    assert_eq!(issue.measurements_text, "Height difference: 0.100");
}

#[test]
fn test_shoulder_threshold_is_strict() {
    let at_threshold = frame_with(|p| {
        p[LEFT_SHOULDER].y = 0.0;
        p[RIGHT_SHOULDER].y = 0.08;
    });
    assert!(!kinds(&at_threshold).contains(&IssueKind::UnevenShoulders));

    let above = frame_with(|p| {
        p[LEFT_SHOULDER].y = 0.0;
        p[RIGHT_SHOULDER].y = 0.081;
    });
    let verdict = classify(&above).unwrap();
    let issue = verdict
        .issues
        .iter()
        .find(|i| i.kind == IssueKind::UnevenShoulders)
        .expect("0.081 exceeds the threshold");
    assert!((issue.severity - 1.215).abs() < 1e-9);
}

#[test]
fn test_wide_ears_trigger_neck_tilt() {
    // Ears spread 0.12 either side, 0.11 above the shoulder midpoint: about 95 degrees
    let frame = frame_with(|p| {
        p[LEFT_EAR] = Landmark::new(0.38, 0.30, 0.0);
        p[RIGHT_EAR] = Landmark::new(0.62, 0.30, 0.0);
    });
    let verdict = classify(&frame).unwrap();
    let issue = verdict
        .issues
        .iter()
        .find(|i| i.kind == IssueKind::ExtremeNeckTilt)
        .unwrap();
    assert!(verdict.measurements.neck_angle_deg > 90.0);
    assert!((issue.severity - (verdict.measurements.neck_angle_deg - 35.0) / 10.0).abs() < 0.01);
    assert_eq!(verdict.issues.len(), 1);
}

#[test]
fn test_nose_offset_triggers_slouching() {
    let frame = frame_with(|p| p[NOSE].x = 0.60);
    let verdict = classify(&frame).unwrap();
    let issue = verdict.issues.iter().find(|i| i.kind == IssueKind::Slouching).unwrap();
    // 0.1 offset minus the 0.05 ideal
    assert!((issue.severity - 0.75).abs() < 1e-9);
    assert_eq!(issue.measurements_text, "Head forward by: 0.050");
}

#[test]
fn test_small_forward_lean_only_triggers_forward_head() {
    let frame = frame_with(|p| {
        p[LEFT_SHOULDER].z = -0.02;
        p[RIGHT_SHOULDER].z = -0.02;
        p[LEFT_HIP].z = -0.04;
        p[RIGHT_HIP].z = -0.04;
    });
    let found = kinds(&frame);
    assert_eq!(found, vec![IssueKind::ForwardHead]);
}

#[test]
fn test_strong_forward_lean_triggers_overlapping_rules() {
    let verdict = classify(&slouched_frame()).unwrap();
    let found: Vec<IssueKind> = verdict.issues.iter().map(|i| i.kind).collect();
    assert_eq!(
        found,
        vec![
            IssueKind::ForwardHead,
            IssueKind::SlouchingForwardLean,
            IssueKind::RoundedShoulders
        ]
    );
    assert_eq!(verdict.issues[0].severity, 8.0);
    assert!((verdict.issues[1].severity - 1.5).abs() < 1e-9);
    assert!((verdict.issues[2].severity - 1.5).abs() < 1e-9);
    assert_eq!(verdict.score(), 89);
}

#[test]
fn test_missing_landmarks_yield_no_verdict() {
    let frame = frame_with(|p| p.truncate(RIGHT_EAR));
    assert!(classify(&frame).is_none());
}

#[test]
fn test_measurements_are_rounded() {
    let frame = frame_with(|p| p[RIGHT_SHOULDER].y = 0.423_456);
    let verdict = classify(&frame).unwrap();
    assert_eq!(verdict.measurements.shoulder_height_diff, 0.023);
}
