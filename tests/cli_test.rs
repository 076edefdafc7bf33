use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn packrat() -> Command {
    Command::cargo_bin("packrat").unwrap()
}

#[test]
fn bwt_mtf_huffman_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("source.txt");
    let compressed_path = temp_dir.path().join("source.huff");
    let out_path = temp_dir.path().join("source.out.txt");
    let data = b"the quick brown fox jumps over the lazy dog, the quick brown fox";
    std::fs::write(&in_path, data)?;

    packrat()
        .arg("compress").arg("huff").arg(&in_path).arg(&compressed_path)
        .arg("-t").arg("bwt").arg("-t").arg("mtf")
        .assert()
        .success();

    packrat()
        .arg("decompress").arg("huff").arg(&compressed_path).arg(&out_path)
        .arg("-t").arg("bwt").arg("-t").arg("mtf")
        .assert()
        .success();

    assert_eq!(std::fs::read(&out_path)?, data);
    Ok(())
}

#[test]
fn each_algo_round_trips_without_transforms() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("source.bin");
    std::fs::write(&in_path, b"banana bandana banana")?;

    for (algo, ext) in [("rle", "rle"), ("lzw", "lzw"), ("huff", "huff")] {
        let compressed_path = temp_dir.path().join(format!("source.{}", ext));
        let out_path = temp_dir.path().join(format!("out.{}.bin", algo));

        packrat().arg("compress").arg(algo).arg(&in_path).arg(&compressed_path).assert().success();
        packrat().arg("decompress").arg(algo).arg(&compressed_path).arg(&out_path).assert().success();

        assert_eq!(std::fs::read(&out_path)?, std::fs::read(&in_path)?, "algo {} did not round-trip", algo);
    }
    Ok(())
}

#[test]
fn empty_file_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("empty.bin");
    std::fs::write(&in_path, b"")?;
    let compressed_path = temp_dir.path().join("empty.rle");
    let out_path = temp_dir.path().join("empty.out.bin");

    packrat().arg("compress").arg("rle").arg(&in_path).arg(&compressed_path).assert().success();
    packrat().arg("decompress").arg("rle").arg(&compressed_path).arg(&out_path).assert().success();

    assert_eq!(std::fs::read(&out_path)?, Vec::<u8>::new());
    Ok(())
}

#[test]
fn rejects_in_place_compression() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("same.rle");
    std::fs::write(&path, b"data")?;

    packrat()
        .arg("compress").arg("rle").arg(&path).arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("in-place"));
    Ok(())
}

#[test]
fn rejects_wrong_output_extension_on_compress() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("source.bin");
    std::fs::write(&in_path, b"data")?;
    let bad_output = temp_dir.path().join("source.wrong");

    packrat()
        .arg("compress").arg("huff").arg(&in_path).arg(&bad_output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("extension"));
    Ok(())
}
