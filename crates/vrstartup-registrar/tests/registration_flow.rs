//! End-to-end registration against an in-memory runtime.

use vrstartup_manifest::{ManifestDocument, ManifestError};
use vrstartup_registrar::{
    ApplicationRegistrar, FailureStage, INSTALL_CONFIRMATION_WAIT, ProgressLevel, ProgressLine,
    RegistrationError, RegistrationState,
};
use vrstartup_runtime::{ApplicationErrorCode, ApplicationType};
use vrstartup_test::{
    MockFault, MockRuntime, RecordingPause, RuntimeCall, TargetFixture, init_test_tracing,
};

fn registrar(
    runtime: &MockRuntime,
    pause: &RecordingPause,
) -> ApplicationRegistrar<MockRuntime, RecordingPause> {
    ApplicationRegistrar::with_pause(runtime.clone(), pause.clone())
}

#[test]
fn test_happy_path_overlay() {
    init_test_tracing();
    let fixture = TargetFixture::new("MyOverlay.exe");
    let runtime = MockRuntime::new();
    let pause = RecordingPause::new();
    let mut lines: Vec<ProgressLine> = Vec::new();

    let outcome =
        registrar(&runtime, &pause).register(&fixture.record("My Overlay", true), &mut lines);

    assert!(outcome.is_success(), "{outcome:?}");
    assert_eq!(outcome.reached, RegistrationState::AutoLaunchSet);
    assert_eq!(outcome.app_key.as_str(), "user.generated.myoverlay");
    assert_eq!(outcome.manifest_path, fixture.manifest_path("myoverlay"));

    let text = std::fs::read_to_string(&outcome.manifest_path).unwrap();
    let document = ManifestDocument::from_json(&text).unwrap();
    assert!(document.applications[0].is_dashboard_overlay);
    assert_eq!(document.applications[0].name, "My Overlay");

    assert_eq!(runtime.installed_keys(), ["user.generated.myoverlay"]);
    assert!(runtime.is_auto_launch("user.generated.myoverlay"));
    assert_eq!(runtime.shutdown_count(), 1);
    assert!(pause.pauses().is_empty());
    assert_eq!(lines.last().map(|l| l.level), Some(ProgressLevel::Info));
    assert!(lines.iter().any(|l| l.level == ProgressLevel::Success));
}

#[test]
fn test_session_opens_as_utility_and_adds_permanently() {
    let fixture = TargetFixture::new("tool.exe");
    let runtime = MockRuntime::new();
    let pause = RecordingPause::new();

    let outcome =
        registrar(&runtime, &pause).register(&fixture.record("Tool", false), &mut Vec::new());

    assert!(outcome.is_success());
    let calls = runtime.calls();
    assert_eq!(calls[0], RuntimeCall::Init(ApplicationType::Utility));
    assert!(calls.contains(&RuntimeCall::AddManifest {
        path: fixture.manifest_path("tool"),
        temporary: false,
    }));
    assert_eq!(
        runtime.count_calls(|c| matches!(c, RuntimeCall::SetAutoLaunch { enabled: true, .. })),
        1
    );
}

#[test]
fn test_configured_application_type_is_used() {
    let fixture = TargetFixture::new("tool.exe");
    let runtime = MockRuntime::new();
    let mut registrar = ApplicationRegistrar::with_pause(runtime.clone(), RecordingPause::new())
        .with_application_type(ApplicationType::Background);

    let outcome = registrar.register(&fixture.record("Tool", false), &mut Vec::new());

    assert!(outcome.is_success());
    assert_eq!(runtime.calls()[0], RuntimeCall::Init(ApplicationType::Background));
}

#[test]
fn test_runtime_unreachable_leaves_manifest_and_skips_shutdown() {
    let fixture = TargetFixture::new("Tool.exe");
    let runtime = MockRuntime::new().with_init_failure("Hmd Not Found");
    let pause = RecordingPause::new();
    let mut lines: Vec<ProgressLine> = Vec::new();

    let outcome = registrar(&runtime, &pause).register(&fixture.record("Tool", false), &mut lines);

    assert_eq!(outcome.failure_stage(), Some(FailureStage::SessionInit));
    assert!(outcome.failure_message().unwrap().contains("Hmd Not Found"));
    assert_eq!(outcome.reached, RegistrationState::ManifestWritten);
    assert!(fixture.manifest_path("tool").exists());
    assert_eq!(runtime.shutdown_count(), 0);
    assert_eq!(lines.last().map(|l| l.level), Some(ProgressLevel::Error));
}

#[test]
fn test_add_failure_reports_runtime_name_and_short_circuits() {
    let fixture = TargetFixture::new("Tool.exe");
    let runtime = MockRuntime::new().with_add_result(ApplicationErrorCode::InvalidManifest);
    let pause = RecordingPause::new();

    let outcome =
        registrar(&runtime, &pause).register(&fixture.record("Tool", false), &mut Vec::new());

    assert_eq!(outcome.failure_stage(), Some(FailureStage::AddManifest));
    assert_eq!(
        outcome.failure_message(),
        Some("VRApplicationError_InvalidManifest")
    );
    assert_eq!(outcome.reached, RegistrationState::SessionOpen);
    assert_eq!(runtime.count_calls(|c| matches!(c, RuntimeCall::IsInstalled(_))), 0);
    assert_eq!(runtime.count_calls(|c| matches!(c, RuntimeCall::SetAutoLaunch { .. })), 0);
    assert_eq!(runtime.shutdown_count(), 1);
}

#[test]
fn test_add_failure_with_unnamed_code_uses_fallback_name() {
    let fixture = TargetFixture::new("Tool.exe");
    let runtime = MockRuntime::new()
        .with_add_result(ApplicationErrorCode::from_raw(4242))
        .with_failing_name_lookup();

    let outcome = registrar(&runtime, &RecordingPause::new())
        .register(&fixture.record("Tool", false), &mut Vec::new());

    assert_eq!(outcome.failure_stage(), Some(FailureStage::AddManifest));
    assert_eq!(outcome.failure_message(), Some("unknown error"));
    assert_eq!(runtime.shutdown_count(), 1);
}

#[test]
fn test_install_lag_waits_once_without_requery() {
    let fixture = TargetFixture::new("Tool.exe");
    let runtime = MockRuntime::new().with_install_lag();
    let pause = RecordingPause::new();
    let mut lines: Vec<ProgressLine> = Vec::new();

    let outcome = registrar(&runtime, &pause).register(&fixture.record("Tool", false), &mut lines);

    assert!(outcome.is_success(), "{outcome:?}");
    assert_eq!(pause.pauses(), [INSTALL_CONFIRMATION_WAIT]);
    assert_eq!(runtime.count_calls(|c| matches!(c, RuntimeCall::IsInstalled(_))), 1);
    assert!(lines.iter().any(|l| l.level == ProgressLevel::Warning));
    assert_eq!(runtime.shutdown_count(), 1);
}

#[test]
fn test_auto_launch_failure_keeps_registration() {
    let fixture = TargetFixture::new("Tool.exe");
    let runtime = MockRuntime::new()
        .with_auto_launch_result(ApplicationErrorCode::UnknownApplication)
        .with_error_name(ApplicationErrorCode::UnknownApplication, "Unknown application");

    let outcome = registrar(&runtime, &RecordingPause::new())
        .register(&fixture.record("Tool", false), &mut Vec::new());

    assert_eq!(outcome.failure_stage(), Some(FailureStage::AutoLaunch));
    assert_eq!(outcome.failure_message(), Some("Unknown application"));
    assert!(outcome.reached.is_registered());
    assert_eq!(runtime.installed_keys(), ["user.generated.tool"]);
    assert!(!runtime.is_auto_launch("user.generated.tool"));
    assert_eq!(runtime.shutdown_count(), 1);
}

#[test]
fn test_transport_fault_is_unexpected_and_still_releases() {
    for fault in [MockFault::AddManifest, MockFault::InstallQuery, MockFault::AutoLaunch] {
        let fixture = TargetFixture::new("Tool.exe");
        let runtime = MockRuntime::new().with_fault(fault);

        let outcome = registrar(&runtime, &RecordingPause::new())
            .register(&fixture.record("Tool", false), &mut Vec::new());

        assert_eq!(outcome.failure_stage(), Some(FailureStage::Unexpected), "{fault:?}");
        assert!(outcome.failure_message().unwrap().contains("connection lost"));
        assert_eq!(runtime.shutdown_count(), 1, "{fault:?}");
        assert_eq!(runtime.calls().last(), Some(&RuntimeCall::Shutdown));
    }
}

#[test]
fn test_panic_inside_session_still_releases() {
    let fixture = TargetFixture::new("Tool.exe");
    let runtime = MockRuntime::new().with_fault(MockFault::PanicOnAddManifest);
    let record = fixture.record("Tool", false);
    let mut registrar = registrar(&runtime, &RecordingPause::new());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        registrar.register(&record, &mut Vec::new())
    }));

    assert!(result.is_err());
    assert_eq!(runtime.shutdown_count(), 1);
    assert_eq!(registrar.last_reached(), RegistrationState::SessionOpen);
}

#[test]
fn test_manifest_write_failure_opens_no_session() {
    let fixture = TargetFixture::new("Tool.exe");
    // A directory where the manifest file should go makes the write fail.
    std::fs::create_dir(fixture.manifest_path("tool")).unwrap();
    let runtime = MockRuntime::new();

    let outcome = registrar(&runtime, &RecordingPause::new())
        .register(&fixture.record("Tool", false), &mut Vec::new());

    assert_eq!(outcome.failure_stage(), Some(FailureStage::ManifestWrite));
    assert_eq!(outcome.reached, RegistrationState::Idle);
    assert!(runtime.calls().is_empty());
}

#[test]
fn test_repeat_registration_is_idempotent() {
    let fixture = TargetFixture::new("Tool.exe");
    let runtime = MockRuntime::new();
    let mut registrar = registrar(&runtime, &RecordingPause::new());
    let record = fixture.record("Tool", false);

    let first = registrar.register(&record, &mut Vec::new());
    let second = registrar.register(&record, &mut Vec::new());

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(fixture.manifest_files(), [fixture.manifest_path("tool")]);
    assert_eq!(runtime.installed_keys(), ["user.generated.tool"]);
    assert_eq!(runtime.shutdown_count(), 2);
}

#[test]
fn test_colliding_names_replace_previous_registration() {
    let first = TargetFixture::new("a.exe");
    let second = TargetFixture::new("b.exe");
    let runtime = MockRuntime::new();
    let mut registrar = registrar(&runtime, &RecordingPause::new());

    let a = registrar.register(&first.record("My-App", false), &mut Vec::new());
    let b = registrar.register(&second.record("my app", false), &mut Vec::new());

    assert!(a.is_success() && b.is_success());
    assert_eq!(a.app_key, b.app_key);
    assert_eq!(runtime.installed_keys(), ["user.generated.myapp"]);
    assert_eq!(
        runtime.manifest_for("user.generated.myapp"),
        Some(second.manifest_path("myapp"))
    );
}

#[test]
fn test_symbol_only_name_uses_fallback_key() {
    let fixture = TargetFixture::new("x.exe");
    let runtime = MockRuntime::new();

    let outcome = registrar(&runtime, &RecordingPause::new())
        .register(&fixture.record("!!!", false), &mut Vec::new());

    assert!(outcome.is_success());
    assert_eq!(outcome.app_key.as_str(), "user.generated.unnamed_app");
    assert!(fixture.manifest_path("unnamed_app").exists());
}

#[test]
fn test_manifest_write_error_source_is_preserved() {
    let fixture = TargetFixture::new("Tool.exe");
    std::fs::create_dir(fixture.manifest_path("tool")).unwrap();
    let record = fixture.record("Tool", false);
    let prepared = vrstartup_manifest::ManifestBuilder::prepare(&record);

    let err = prepared.document.write_to(&prepared.path).unwrap_err();
    let wrapped = RegistrationError::ManifestWrite(err);
    assert_eq!(wrapped.stage(), FailureStage::ManifestWrite);
    assert!(matches!(
        std::error::Error::source(&wrapped).and_then(|s| s.downcast_ref::<ManifestError>()),
        Some(ManifestError::Write { .. })
    ));
}
