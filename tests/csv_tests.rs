use bulker::csv::{build_document, deliver};
use bulker::models::CSV_HEADER;
use bulker::prompt::{Confirm, Prompter};
use bulker::{generate, BulkerError, CsvDocument, Frontend, License, Outcome, RunParameters};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

/// Fixed answer, counting how often it was asked.
struct Answer {
    yes: bool,
    asked: usize,
}

impl Confirm for Answer {
    fn confirm(&mut self, _question: &str) -> bool {
        self.asked += 1;
        self.yes
    }
}

fn drum_folder(root: &Path) -> RunParameters {
    let sounds = root.join("sounds");
    fs::create_dir_all(&sounds).unwrap();
    for name in ["kick.wav", "snare.wav", "hat.flac"] {
        File::create(sounds.join(name)).unwrap();
    }
    let desc = root.join("desc.txt");
    fs::write(&desc, "Drum hits").unwrap();
    RunParameters {
        dir_name: sounds,
        pattern: "*.wav".into(),
        desc_file: desc,
        tags: "drum".into(),
        name_tags: true,
        sort_files: true,
        ..RunParameters::default()
    }
}

#[test]
fn one_row_per_matching_file_with_derived_tags() {
    let td = tempdir().unwrap();
    let params = drum_folder(td.path());
    let doc = build_document(&params).unwrap();

    let tags: HashMap<String, String> = doc
        .rows
        .iter()
        .map(|r| (r.audio_filename.clone(), r.tags.clone()))
        .collect();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags["kick.wav"], "\"drum kick\"");
    assert_eq!(tags["snare.wav"], "\"drum snare\"");
    assert!(!tags.contains_key("hat.flac"));

    let lines = doc.lines();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines[1], "kick.wav,kick.wav,\"drum kick\",,\"Drum hits\",Creative Commons 0,,0");
}

#[test]
fn constant_columns_are_filled_from_parameters() {
    let td = tempdir().unwrap();
    let params = RunParameters {
        name_tags: false,
        geotag: "41.40348, 2.189420, 18".into(),
        license: License::NonCommercial,
        pack_name: "Drums, vol. 1".into(),
        explicit: true,
        ..drum_folder(td.path())
    };
    let doc = build_document(&params).unwrap();
    assert_eq!(
        doc.rows[0].to_line(),
        "kick.wav,kick.wav,\"drum\",\"41.40348, 2.189420, 18\",\"Drum hits\",Attribution Noncommercial,\"Drums, vol. 1\",1"
    );
}

#[test]
fn standard_csv_reader_decodes_every_field() {
    let td = tempdir().unwrap();
    let params = RunParameters {
        pack_name: "Drums, vol. 1".into(),
        geotag: "41.40348, 2.189420, 18".into(),
        ..drum_folder(td.path())
    };
    let original = "A \"dry\" kit,\nclose \"mics\".\n";
    fs::write(&params.desc_file, original).unwrap();
    let rendered = build_document(&params).unwrap().render();

    let mut reader = csv::ReaderBuilder::new()
        .double_quote(false)
        .escape(Some(b'\\'))
        .from_reader(rendered.as_bytes());
    let header = reader.headers().unwrap().clone();
    assert_eq!(header.iter().collect::<Vec<_>>().join(","), CSV_HEADER);

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record.len(), 8);
        assert_eq!(&record[2], format!("drum {}", record[0].trim_end_matches(".wav")));
        assert_eq!(&record[3], "41.40348, 2.189420, 18");
        assert_eq!(&record[4], original);
        assert_eq!(&record[6], "Drums, vol. 1");
    }
}

#[test]
fn missing_output_hands_document_back() {
    let td = tempdir().unwrap();
    let params = drum_folder(td.path());
    let mut answer = Answer { yes: false, asked: 0 };
    match generate(&params, Frontend::Command, &mut answer).unwrap() {
        Outcome::Display(doc) => assert_eq!(doc.rows.len(), 2),
        other => panic!("expected Display, got {:?}", other),
    }
}

#[test]
fn writes_utf8_file() {
    let td = tempdir().unwrap();
    let out = td.path().join("out.csv");
    let params = RunParameters {
        output_file: Some(out.clone()),
        ..drum_folder(td.path())
    };
    let mut answer = Answer { yes: false, asked: 0 };
    let outcome = generate(&params, Frontend::Command, &mut answer).unwrap();
    assert_eq!(outcome, Outcome::Written(out.clone()));
    assert_eq!(answer.asked, 0);

    let s = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = s.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(s.ends_with('\n'));
}

#[test]
fn command_mode_declined_overwrite_keeps_file() {
    let td = tempdir().unwrap();
    let out = td.path().join("out.csv");
    fs::write(&out, "old").unwrap();
    let params = RunParameters {
        output_file: Some(out.clone()),
        ..drum_folder(td.path())
    };

    let mut prompter = Prompter::new(Cursor::new(b"n\n".to_vec()), Vec::new());
    let outcome = generate(&params, Frontend::Command, &mut prompter).unwrap();
    assert_eq!(outcome, Outcome::Declined);
    assert_eq!(fs::read_to_string(&out).unwrap(), "old");

    let (_, shown) = prompter.into_parts();
    let shown = String::from_utf8(shown).unwrap();
    assert_eq!(shown, format!("Destination file {} exists. Overwrite? [y/N] ", out.display()));
}

#[test]
fn command_mode_overwrites_after_yes() {
    let td = tempdir().unwrap();
    let out = td.path().join("out.csv");
    fs::write(&out, "old").unwrap();
    let params = RunParameters {
        output_file: Some(out.clone()),
        ..drum_folder(td.path())
    };
    let mut prompter = Prompter::new(Cursor::new(b"Y\n".to_vec()), Vec::new());
    let outcome = generate(&params, Frontend::Command, &mut prompter).unwrap();
    assert_eq!(outcome, Outcome::Written(out.clone()));
    assert!(fs::read_to_string(&out).unwrap().starts_with(CSV_HEADER));
}

#[test]
fn eof_at_prompt_declines() {
    let td = tempdir().unwrap();
    let out = td.path().join("out.csv");
    fs::write(&out, "old").unwrap();
    let mut prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());
    let outcome = deliver(CsvDocument::default(), Some(&out), Frontend::Command, &mut prompter).unwrap();
    assert_eq!(outcome, Outcome::Declined);
}

#[test]
fn form_mode_overwrites_silently() {
    let td = tempdir().unwrap();
    let out = td.path().join("out.csv");
    fs::write(&out, "old").unwrap();
    let params = RunParameters {
        output_file: Some(out.clone()),
        ..drum_folder(td.path())
    };
    let mut answer = Answer { yes: false, asked: 0 };
    let outcome = generate(&params, Frontend::Form, &mut answer).unwrap();
    assert_eq!(outcome, Outcome::Written(out.clone()));
    assert_eq!(answer.asked, 0);
    assert!(fs::read_to_string(&out).unwrap().starts_with(CSV_HEADER));
}

#[test]
fn failed_write_leaves_no_file() {
    let td = tempdir().unwrap();
    let out = td.path().join("no_such_dir").join("out.csv");
    let params = RunParameters {
        output_file: Some(out.clone()),
        ..drum_folder(td.path())
    };
    let mut answer = Answer { yes: true, asked: 0 };
    let err = generate(&params, Frontend::Command, &mut answer).unwrap_err();
    assert!(matches!(err, BulkerError::WriteFailure { .. }));
    assert_eq!(err.to_string(), format!("Error: writing file {} failed.", out.display()));
    assert!(!out.exists());
}

#[test]
fn validation_failure_stops_generation() {
    let td = tempdir().unwrap();
    let out = td.path().join("out.csv");
    let params = RunParameters {
        tags: String::new(),
        geotag: "bad".into(),
        output_file: Some(out.clone()),
        ..drum_folder(td.path())
    };
    let mut answer = Answer { yes: true, asked: 0 };
    let err = generate(&params, Frontend::Command, &mut answer).unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Error: missing tags.".to_string(), "Error: geotag bad not valid.".to_string()]
    );
    assert!(!out.exists());
}

#[cfg(unix)]
mod permissions {
    use super::*;
    use std::os::unix::fs::{symlink, PermissionsExt};

    fn mode(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn new_file_gets_the_usual_create_mode() {
        let td = tempdir().unwrap();
        // a plain create in the same place shows what the umask allows
        let reference = td.path().join("reference");
        File::create(&reference).unwrap();

        let out = td.path().join("out.csv");
        let mut answer = Answer { yes: true, asked: 0 };
        deliver(CsvDocument::default(), Some(&out), Frontend::Form, &mut answer).unwrap();
        assert_eq!(mode(&out), mode(&reference));
    }

    #[test]
    fn overwrite_keeps_existing_mode() {
        let td = tempdir().unwrap();
        let out = td.path().join("out.csv");
        fs::write(&out, "old").unwrap();
        fs::set_permissions(&out, fs::Permissions::from_mode(0o640)).unwrap();

        let mut answer = Answer { yes: true, asked: 0 };
        deliver(CsvDocument::default(), Some(&out), Frontend::Command, &mut answer).unwrap();
        assert_eq!(answer.asked, 1);
        assert_eq!(mode(&out), 0o640);
        assert!(fs::read_to_string(&out).unwrap().starts_with(CSV_HEADER));
    }

    #[test]
    fn symlinked_output_replaces_the_target() {
        let td = tempdir().unwrap();
        let real = td.path().join("real.csv");
        fs::write(&real, "old").unwrap();
        let link = td.path().join("link.csv");
        symlink("real.csv", &link).unwrap();

        let mut answer = Answer { yes: true, asked: 0 };
        deliver(CsvDocument::default(), Some(&link), Frontend::Form, &mut answer).unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert!(fs::read_to_string(&real).unwrap().starts_with(CSV_HEADER));
    }
}
