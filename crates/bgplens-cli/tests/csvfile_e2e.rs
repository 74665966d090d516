//! End-to-end retrieval through the csvfile interface.

use anyhow::Result;
use bgplens_testing::fixtures::{ANNOUNCEMENT, record_line};
use bgplens_testing::ArchiveWorld;

#[test]
fn test_index_driven_retrieval() -> Result<()> {
    let world = ArchiveWorld::new();
    let early = world.add_dump(
        "routeviews",
        "rv2",
        "updates",
        10,
        &[record_line(10, &[ANNOUNCEMENT])],
    )?;
    let late = world.add_dump(
        "ris",
        "rrc00",
        "updates",
        20,
        &[record_line(20, &[ANNOUNCEMENT])],
    )?;
    // listed out of order; the stream must still come back dump-time sorted
    let index = world.write_index(&[
        (late.display().to_string(), "ris", "rrc00", "updates", 20),
        (early.display().to_string(), "routeviews", "rv2", "updates", 10),
    ])?;

    let result = world.run(&[
        "-d",
        "csvfile",
        "-o",
        &format!("csv-file,{}", index.display()),
        "-w",
        "0,100",
        "-r",
    ])?;

    assert_eq!(result.code(), Some(0), "stderr: {}", result.stderr());
    assert_eq!(
        result.stdout_lines(),
        vec![
            "10|routeviews|rv2|update|valid_record|10|start|",
            "20|ris|rrc00|update|valid_record|20|start|",
        ]
    );
    Ok(())
}

#[test]
fn test_index_metadata_wins_over_file_names() -> Result<()> {
    // the catalog trusts index columns, not the dump file's own name
    let world = ArchiveWorld::new();
    let dump = world.add_dump("ris", "rrc00", "updates", 20, &[record_line(20, &[])])?;
    let index = world.write_index(&[(
        dump.display().to_string(),
        "indexed-project",
        "indexed-collector",
        "updates",
        20,
    )])?;

    let result = world.run(&[
        "-d",
        "csvfile",
        "-o",
        &format!("csv-file,{}", index.display()),
        "-w",
        "0,100",
        "-r",
    ])?;

    assert!(result.success());
    assert_eq!(
        result.stdout_lines(),
        vec!["20|indexed-project|indexed-collector|update|valid_record|20|start|"]
    );
    Ok(())
}

#[test]
fn test_listed_but_missing_dump_is_corrupted_source() -> Result<()> {
    let world = ArchiveWorld::new();
    let index = world.write_index(&[(
        world
            .archive()
            .join("ris.rrc00.updates.30.dump")
            .display()
            .to_string(),
        "ris",
        "rrc00",
        "updates",
        30,
    )])?;

    let result = world.run(&[
        "-d",
        "csvfile",
        "-o",
        &format!("csv-file,{}", index.display()),
        "-w",
        "0,100",
        "-r",
    ])?;

    assert!(result.success());
    assert_eq!(
        result.stdout_lines(),
        vec!["30|ris|rrc00|update|corrupted_source|30|start|"]
    );
    Ok(())
}

#[test]
fn test_missing_index_fails_initialization() -> Result<()> {
    let world = ArchiveWorld::new();
    let result = world.run(&[
        "-d",
        "csvfile",
        "-o",
        "csv-file,/nonexistent/index.csv",
        "-w",
        "0,100",
    ])?;

    assert_eq!(result.code(), Some(1));
    assert!(result
        .stderr()
        .contains("Could not initialize data interface"));
    Ok(())
}
