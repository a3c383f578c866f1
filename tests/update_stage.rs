mod common;

use anyhow::Result;
use common::Workspace;
use genbranch::GenError;
use genbranch::stage::StageOutcome;
use std::fs;

/// Workspace after the create stage, with `x.bin` and `a/y.bin` published
fn published() -> Result<Workspace> {
    let ws = Workspace::new()?;
    ws.create()?;
    ws.publish("x.bin", b"x-v1")?;
    ws.publish("a/y.bin", b"y-v1")?;
    Ok(ws)
}

#[test]
fn test_first_update_commits_copied_files() -> Result<()> {
    let ws = published()?;

    let (outcome, confirm) = ws.execute(&[true, false])?;

    assert_eq!(
        outcome,
        StageOutcome::Committed {
            changed: vec!["a/y.bin".to_string(), "x.bin".to_string()],
            removed: vec![],
            pushed: false,
        }
    );
    assert_eq!(
        confirm.asked,
        vec!["Continue?", "Push (force) changes to remote?"]
    );
    assert_eq!(ws.committed_files(), vec!["a/y.bin", "x.bin"]);
    assert_eq!(ws.commits_above_marker(), 1);
    assert_eq!(ws.commit_count(), 2);
    Ok(())
}

#[test]
fn test_update_copies_current_source_bytes() -> Result<()> {
    let ws = published()?;
    ws.write_source("x.bin", b"x-v2")?;
    ws.write_source("a/y.bin", &[0u8, 159, 146, 150, 255])?;

    ws.execute(&[true, false])?;

    for rel in ["x.bin", "a/y.bin"] {
        assert_eq!(
            fs::read(ws.generated.join(rel))?,
            fs::read(ws.source.join(rel))?,
            "{rel} differs"
        );
    }
    assert_eq!(ws.committed_content("x.bin"), "x-v2");
    Ok(())
}

#[test]
fn test_second_run_without_changes_is_a_no_op() -> Result<()> {
    let ws = published()?;
    ws.execute(&[true, false])?;
    let head = ws.gen_git("rev-parse HEAD");

    let (outcome, confirm) = ws.execute(&[true, true])?;

    assert_eq!(outcome, StageOutcome::Unchanged);
    assert_eq!(confirm.asked, vec!["Continue?"]);
    assert_eq!(ws.gen_git("rev-parse HEAD"), head);
    assert_eq!(ws.commits_above_marker(), 1);
    Ok(())
}

#[test]
fn test_update_with_nothing_copied_is_a_no_op() -> Result<()> {
    let ws = Workspace::new()?;
    ws.create()?;

    let (outcome, _) = ws.execute(&[true])?;

    assert_eq!(outcome, StageOutcome::Unchanged);
    assert_eq!(ws.commit_count(), 1);
    Ok(())
}

#[test]
fn test_only_changed_file_is_reported_but_all_are_committed() -> Result<()> {
    let ws = published()?;
    ws.execute(&[true, false])?;
    ws.write_source("x.bin", b"x-v2")?;

    let (outcome, _) = ws.execute(&[true, false])?;

    assert_eq!(
        outcome,
        StageOutcome::Committed {
            changed: vec!["x.bin".to_string()],
            removed: vec![],
            pushed: false,
        }
    );
    assert_eq!(ws.committed_files(), vec!["a/y.bin", "x.bin"]);
    assert_eq!(ws.committed_content("x.bin"), "x-v2");
    assert_eq!(ws.committed_content("a/y.bin"), "y-v1");
    Ok(())
}

#[test]
fn test_history_never_accumulates() -> Result<()> {
    let ws = published()?;

    for round in 0..4 {
        ws.write_source("x.bin", format!("x-round-{round}").as_bytes())?;
        let (outcome, _) = ws.execute(&[true, false])?;
        assert!(matches!(outcome, StageOutcome::Committed { .. }));
        assert_eq!(ws.commits_above_marker(), 1, "round {round}");
        assert_eq!(ws.commit_count(), 2, "round {round}");
    }
    assert_eq!(ws.committed_content("x.bin"), "x-round-3");
    Ok(())
}

#[test]
fn test_missing_source_file_fails_before_copying() -> Result<()> {
    let ws = published()?;
    ws.execute(&[true, false])?;
    let head = ws.gen_git("rev-parse HEAD");

    ws.write_source("x.bin", b"x-v2")?;
    ws.write_generated("a/b.bin", b"orphaned")?;

    let err = ws.execute(&[true, true]).unwrap_err();

    match err.downcast_ref::<GenError>() {
        Some(GenError::SourceFileMissing {
            relative,
            source_file,
        }) => {
            assert_eq!(relative, "a/b.bin");
            assert_eq!(source_file, &ws.source.join("a/b.bin"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(genbranch::error::exit_code_for(&err), 10);
    assert!(err.to_string().contains("a/b.bin"));

    // Nothing copied, nothing staged, nothing committed
    assert_eq!(fs::read(ws.generated.join("x.bin"))?, b"x-v1");
    assert_eq!(ws.gen_git("rev-parse HEAD"), head);
    assert!(ws.gen_git("diff --cached --name-only").is_empty());
    Ok(())
}

#[test]
fn test_removed_generated_file_drops_out_of_commit() -> Result<()> {
    let ws = published()?;
    ws.execute(&[true, false])?;
    fs::remove_file(ws.generated.join("a/y.bin"))?;

    let (outcome, _) = ws.execute(&[true, false])?;

    assert_eq!(
        outcome,
        StageOutcome::Committed {
            changed: vec![],
            removed: vec!["a/y.bin".to_string()],
            pushed: false,
        }
    );
    assert_eq!(ws.committed_files(), vec!["x.bin"]);
    assert_eq!(ws.commits_above_marker(), 1);
    Ok(())
}

#[test]
fn test_hidden_files_are_not_tracked() -> Result<()> {
    let ws = published()?;
    ws.write_generated(".notes", b"local only")?;
    ws.write_generated(".cache/blob", b"local only")?;

    ws.execute(&[true, false])?;
    let (outcome, _) = ws.execute(&[true, false])?;

    assert_eq!(outcome, StageOutcome::Unchanged);
    assert_eq!(ws.committed_files(), vec!["a/y.bin", "x.bin"]);
    Ok(())
}

#[test]
fn test_update_runs_from_generated_folder() -> Result<()> {
    let ws = published()?;

    let (outcome, _) = ws.execute_from(&ws.generated.join("a"), &[true, false])?;

    assert!(matches!(outcome, StageOutcome::Committed { .. }));
    assert_eq!(ws.commits_above_marker(), 1);
    Ok(())
}

#[test]
fn test_missing_marker_tag_refuses_to_commit() -> Result<()> {
    let ws = published()?;
    ws.execute(&[true, false])?;
    let head = ws.gen_git("rev-parse HEAD");

    ws.gen_git("tag --delete gen_empty_commit");
    ws.write_source("x.bin", b"x-v2")?;

    let err = ws.execute(&[true, true]).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<GenError>(),
        Some(GenError::ResetFailed { .. })
    ));
    assert_eq!(ws.gen_git("rev-parse HEAD"), head);
    assert_eq!(ws.commit_count(), 2);
    Ok(())
}

#[test]
fn test_force_push_replaces_remote_snapshot() -> Result<()> {
    let ws = Workspace::new()?;
    let bare = ws.add_bare_remote("origin")?;
    let (created, _) = ws.execute(&[true, true])?;
    assert!(matches!(created, StageOutcome::Created { pushed: true, .. }));

    ws.publish("x.bin", b"x-v1")?;
    let (first, _) = ws.execute(&[true, true])?;
    assert!(matches!(first, StageOutcome::Committed { pushed: true, .. }));
    let first_head = ws.gen_git("rev-parse HEAD");

    ws.write_source("x.bin", b"x-v2")?;
    let (second, _) = ws.execute(&[true, true])?;
    assert!(matches!(second, StageOutcome::Committed { pushed: true, .. }));
    let second_head = ws.gen_git("rev-parse HEAD");

    assert_ne!(first_head, second_head);
    let remote = ws.git.run("rev-parse site_gen", Some(&bare))?;
    assert_eq!(remote.stdout, second_head);
    let count = ws.git.run("rev-list --count site_gen", Some(&bare))?;
    assert_eq!(count.stdout, "2");
    Ok(())
}

#[test]
fn test_declined_push_leaves_remote_alone() -> Result<()> {
    let ws = Workspace::new()?;
    let bare = ws.add_bare_remote("origin")?;
    ws.execute(&[true, true])?;
    let pushed_root = ws.gen_git("rev-parse HEAD");

    ws.publish("x.bin", b"x-v1")?;
    let (outcome, _) = ws.execute(&[true, false])?;
    assert!(matches!(outcome, StageOutcome::Committed { pushed: false, .. }));

    let remote = ws.git.run("rev-parse site_gen", Some(&bare))?;
    assert_eq!(remote.stdout, pushed_root);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_pathspec_characters_in_names_are_literal() -> Result<()> {
    let ws = Workspace::new()?;
    ws.create()?;
    ws.publish("x.bin", b"x-v1")?;
    ws.publish(":report.bin", b"report")?;
    ws.publish("a/*.bin", b"star")?;
    ws.publish("a/[1].bin", b"bracket")?;

    let (first, _) = ws.execute(&[true, false])?;
    assert!(matches!(first, StageOutcome::Committed { .. }));
    assert_eq!(
        ws.committed_files(),
        vec![":report.bin", "a/*.bin", "a/[1].bin", "x.bin"]
    );

    let (second, _) = ws.execute(&[true, false])?;
    assert_eq!(second, StageOutcome::Unchanged);
    Ok(())
}

#[test]
fn test_removing_every_file_commits_empty_snapshot() -> Result<()> {
    let ws = published()?;
    ws.execute(&[true, false])?;
    fs::remove_file(ws.generated.join("x.bin"))?;
    fs::remove_file(ws.generated.join("a/y.bin"))?;

    let (outcome, _) = ws.execute(&[true, false])?;

    match outcome {
        StageOutcome::Committed {
            changed, removed, ..
        } => {
            assert!(changed.is_empty());
            assert_eq!(removed.len(), 2);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(ws.committed_files().is_empty());
    assert_eq!(ws.commits_above_marker(), 1);

    let (again, _) = ws.execute(&[true, false])?;
    assert_eq!(again, StageOutcome::Unchanged);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_failed_commit_never_pushes() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let ws = Workspace::new()?;
    let bare = ws.add_bare_remote("origin")?;
    ws.execute(&[true, true])?;
    ws.publish("x.bin", b"x-v1")?;
    ws.execute(&[true, true])?;
    let published_head = ws.gen_git("rev-parse HEAD");

    let hooks = ws.generated.join(".git/hooks");
    fs::create_dir_all(&hooks)?;
    let hook = hooks.join("pre-commit");
    fs::write(&hook, "#!/bin/sh\nexit 1\n")?;
    fs::set_permissions(&hook, fs::Permissions::from_mode(0o755))?;
    ws.write_source("x.bin", b"x-v2")?;

    let err = ws.execute(&[true, true]).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<GenError>(),
        Some(GenError::CommitFailed(_))
    ));
    let remote_head = ws.git.run("rev-parse site_gen", Some(&bare))?;
    assert_eq!(remote_head.stdout, published_head);
    let remote_files = ws.git.run("ls-tree -r --name-only site_gen", Some(&bare))?;
    assert_eq!(remote_files.stdout, "x.bin");

    fs::remove_file(&hook)?;
    let (outcome, _) = ws.execute(&[true, true])?;
    assert!(matches!(outcome, StageOutcome::Committed { pushed: true, .. }));
    assert_eq!(ws.committed_content("x.bin"), "x-v2");
    assert_eq!(ws.commits_above_marker(), 1);
    Ok(())
}
