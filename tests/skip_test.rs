// tests/skip_test.rs
use autorelease::error::{Error, SkipReason, NEUTRAL_EXIT_CODE};

#[test]
fn test_ref_mismatch_display() {
    let reason = SkipReason::RefMismatch {
        git_ref: "refs/heads/feature".to_string(),
        default_branch: "master".to_string(),
    };

    let message = reason.to_string();
    assert!(
        message.contains("refs/heads/feature"),
        "message should name the pushed ref, got: {}",
        message
    );
    assert!(
        message.contains("master"),
        "message should name the default branch, got: {}",
        message
    );
}

#[test]
fn test_manifest_missing_display() {
    let reason = SkipReason::ManifestMissing {
        path: "/ws/package.json".to_string(),
    };

    let message = reason.to_string();
    assert!(
        message.contains("package file not found"),
        "got: {}",
        message
    );
    assert!(message.contains("/ws/package.json"), "got: {}", message);
}

#[test]
fn test_tag_exists_display() {
    let reason = SkipReason::TagExists {
        tag: "v1.2.3".to_string(),
    };

    let message = reason.to_string();
    assert!(message.contains("tag already exists"), "got: {}", message);
    assert!(message.contains("v1.2.3"), "got: {}", message);
}

#[test]
fn test_version_published_display() {
    let reason = SkipReason::VersionPublished {
        version: "1.2.3".to_string(),
    };

    let message = reason.to_string();
    assert!(
        message.contains("version already published"),
        "got: {}",
        message
    );
    assert!(message.contains("1.2.3"), "got: {}", message);
}

#[test]
fn test_every_skip_reason_is_benign() {
    let reasons = vec![
        SkipReason::RefMismatch {
            git_ref: "refs/heads/dev".to_string(),
            default_branch: "master".to_string(),
        },
        SkipReason::ManifestMissing {
            path: "/ws/package.json".to_string(),
        },
        SkipReason::TagExists {
            tag: "v1.0.0".to_string(),
        },
        SkipReason::VersionPublished {
            version: "1.0.0".to_string(),
        },
    ];

    for reason in reasons {
        let err = Error::Skip(reason);
        assert!(err.is_benign(), "should be benign: {}", err);
    }
}

#[test]
fn test_fatal_kinds_are_not_benign() {
    let errors = vec![
        Error::config("missing placeholder in variable: TAG_NAME"),
        Error::event("cannot parse event file"),
        Error::manifest("missing version field"),
        Error::CommandFailed {
            program: "git".to_string(),
            code: 128,
            stderr: String::new(),
        },
    ];

    for err in errors {
        assert!(!err.is_benign(), "should be fatal: {}", err);
    }
}

#[test]
fn test_neutral_exit_code_is_distinguished() {
    assert_ne!(NEUTRAL_EXIT_CODE, 0);
    assert_ne!(NEUTRAL_EXIT_CODE, 1);
}
