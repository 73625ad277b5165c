//! Corruption scenarios: a copy that lands truncated must never be trusted,
//! and a move that never committed must never be "undone".

use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tidy_move::verify::verify_copy;
use tidy_move::{Config, MoveOutcome, MoveReport, OperationKind, RollbackManager};

fn cfg_with_data_dir(data_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn truncated_copy_fails_verification() -> Result<(), Box<dyn std::error::Error>> {
    let work = tempdir()?;
    let src = work.path().join("authoritative.bin");
    let dst = work.path().join("truncated.bin");
    let payload: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(&src, &payload)?;
    // Simulate a copy that completed but lost its tail.
    fs::write(&dst, &payload[..payload.len() - 512])?;

    assert!(!verify_copy(&src, &dst));
    Ok(())
}

#[test]
fn same_size_bitrot_fails_verification_below_threshold() -> Result<(), Box<dyn std::error::Error>>
{
    let work = tempdir()?;
    let src = work.path().join("a.bin");
    let dst = work.path().join("b.bin");
    let mut payload = vec![7u8; 8192];
    fs::write(&src, &payload)?;
    payload[4100] ^= 0xff; // one flipped byte, same length
    fs::write(&dst, &payload)?;

    assert!(!verify_copy(&src, &dst));
    Ok(())
}

/// A journaled VerificationFailed attempt records that the authoritative copy
/// never relocated, and undo refuses to touch it.
#[test]
fn failed_attempt_is_never_reversed() -> Result<(), Box<dyn std::error::Error>> {
    let data = tempdir()?;
    let cfg = cfg_with_data_dir(data.path());
    let mut rollback = RollbackManager::open(&cfg)?;

    rollback.record_operation(
        OperationKind::Move,
        &MoveReport {
            outcome: MoveOutcome::VerificationFailed,
            source: "/tmp/src/important.dat".into(),
            destination: "/tmp/dst/important.dat".into(),
            backup_path: None,
        },
    );

    assert_eq!(rollback.operations().len(), 1, "attempt is in the audit trail");
    assert_eq!(rollback.undo_depth(), 0);
    assert!(!rollback.undo_last_operation(), "nothing committed, nothing to undo");
    Ok(())
}
