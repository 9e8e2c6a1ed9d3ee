use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::modules::corpus::ContentPools;
use crate::modules::engine::config::{DateRange, GenerationConfig};
use crate::modules::engine::run::{artifact_name, run, MessageWriter};
use crate::modules::engine::selector::SelectionMode;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailforgeResult;
use crate::raise_error;

/// Captures persisted artifacts in memory.
#[derive(Default)]
struct VecWriter {
    files: Vec<(String, Vec<u8>)>,
}

impl MessageWriter for VecWriter {
    fn persist(&mut self, filename: &str, bytes: &[u8]) -> MailforgeResult<()> {
        self.files.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Fails on the n-th persist call (1-based).
struct FailingWriter {
    fail_on: usize,
    written: usize,
}

impl MessageWriter for FailingWriter {
    fn persist(&mut self, _filename: &str, _bytes: &[u8]) -> MailforgeResult<()> {
        self.written += 1;
        if self.written >= self.fail_on {
            return Err(raise_error!(
                "disk full".into(),
                ErrorCode::WriteFailed
            ));
        }
        Ok(())
    }
}

fn base_config() -> GenerationConfig {
    GenerationConfig {
        html_pct: 0,
        attach_pct: 0,
        subject_len: 50,
        num_emails: 3,
        selection_mode: SelectionMode::Random,
        max_attachments: 4,
        seed: Some(1),
        date_range: Some(
            DateRange::from_dates(
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            )
            .unwrap(),
        ),
        business: None,
        output_dir: PathBuf::from("unused"),
    }
}

fn pools_with(dir: &std::path::Path) -> ContentPools {
    let body = dir.join("hello.txt");
    fs::write(&body, "Hello world").unwrap();
    ContentPools {
        senders: vec!["alice@example.com".to_string()],
        recipients: vec!["bob@example.org".to_string()],
        relay_hosts: vec!["mx1.example.com".to_string(), "mx2.example.com".to_string()],
        text_bodies: vec![body],
        html_bodies: Vec::new(),
        attachments: Vec::new(),
    }
}

fn first_address(address: &mail_parser::Address<'_>) -> String {
    match address {
        mail_parser::Address::List(list) => {
            list[0].address.clone().unwrap().into_owned()
        }
        mail_parser::Address::Group(groups) => groups[0].addresses[0]
            .address
            .clone()
            .unwrap()
            .into_owned(),
    }
}

#[test]
fn test_plain_text_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let pools = pools_with(dir.path());
    let config = base_config();
    let mut writer = VecWriter::default();

    let written = run(&config, &pools, &mut writer).unwrap();
    assert_eq!(written, 3);
    assert_eq!(writer.files.len(), 3);

    let mut message_ids = Vec::new();
    for (index, (name, bytes)) in writer.files.iter().enumerate() {
        assert_eq!(*name, artifact_name(index as u64 + 1));

        let parsed = mail_parser::MessageParser::default().parse(bytes).unwrap();
        assert_eq!(first_address(parsed.from().unwrap()), "alice@example.com");
        assert_eq!(first_address(parsed.to().unwrap()), "bob@example.org");
        assert_eq!(parsed.body_text(0).unwrap().trim_end(), "Hello world");
        assert_eq!(parsed.subject(), Some("Hello world"));
        assert!(parsed.html_body.is_empty(), "plain-text run must not emit HTML parts");
        assert_eq!(parsed.attachments().count(), 0);
        message_ids.push(parsed.message_id().unwrap().to_string());
    }
    message_ids.sort();
    message_ids.dedup();
    assert_eq!(message_ids.len(), 3, "Message-IDs must be distinct");
}

#[test]
fn test_identical_seeds_reproduce_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let pools = pools_with(dir.path());
    let config = base_config();

    let mut first = VecWriter::default();
    let mut second = VecWriter::default();
    run(&config, &pools, &mut first).unwrap();
    run(&config, &pools, &mut second).unwrap();

    assert_eq!(first.files, second.files);
}

#[test]
fn test_different_seeds_diverge() {
    let dir = tempfile::tempdir().unwrap();
    let pools = pools_with(dir.path());
    let mut config = base_config();

    let mut first = VecWriter::default();
    run(&config, &pools, &mut first).unwrap();
    config.seed = Some(2);
    let mut second = VecWriter::default();
    run(&config, &pools, &mut second).unwrap();

    assert_ne!(first.files, second.files);
}

#[test]
fn test_writer_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let pools = pools_with(dir.path());
    let mut config = base_config();
    config.num_emails = 10;

    let mut writer = FailingWriter {
        fail_on: 2,
        written: 0,
    };
    let error = run(&config, &pools, &mut writer).unwrap_err();
    assert_eq!(error.code(), ErrorCode::WriteFailed);
    assert_eq!(writer.written, 2, "run stops at the first failed write");
}

#[test]
fn test_empty_sender_pool_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut pools = pools_with(dir.path());
    pools.senders.clear();
    let config = base_config();

    let mut writer = VecWriter::default();
    let error = run(&config, &pools, &mut writer).unwrap_err();
    assert_eq!(error.code(), ErrorCode::EmptyPool);
}

#[test]
fn test_attachments_are_included_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let mut pools = pools_with(dir.path());
    for name in ["a.pdf", "b.png", "c.bin"] {
        let path = dir.path().join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        pools.attachments.push(path);
    }
    let mut config = base_config();
    config.attach_pct = 100;
    config.num_emails = 20;

    let mut writer = VecWriter::default();
    run(&config, &pools, &mut writer).unwrap();

    for (_, bytes) in &writer.files {
        let parsed = mail_parser::MessageParser::default().parse(bytes).unwrap();
        let count = parsed.attachments().count();
        assert!(
            (1..=4).contains(&count),
            "expected 1..=4 attachments, found {}",
            count
        );
    }
}

#[test]
fn test_linear_mode_rotates_senders_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut pools = pools_with(dir.path());
    pools.senders = vec![
        "one@example.com".to_string(),
        "two@example.com".to_string(),
        "three@example.com".to_string(),
    ];
    let mut config = base_config();
    config.selection_mode = SelectionMode::Linear;
    config.num_emails = 6;

    let mut writer = VecWriter::default();
    run(&config, &pools, &mut writer).unwrap();

    let senders: Vec<String> = writer
        .files
        .iter()
        .map(|(_, bytes)| {
            let parsed = mail_parser::MessageParser::default().parse(bytes).unwrap();
            first_address(parsed.from().unwrap())
        })
        .collect();
    assert_eq!(
        senders,
        vec![
            "one@example.com",
            "two@example.com",
            "three@example.com",
            "one@example.com",
            "two@example.com",
            "three@example.com",
        ]
    );
}

#[test]
fn test_html_messages_carry_both_parts() {
    let dir = tempfile::tempdir().unwrap();
    let mut pools = pools_with(dir.path());
    let html = dir.path().join("news.html");
    fs::write(&html, "<h1>Team news</h1><p>All hands on Friday</p>").unwrap();
    pools.html_bodies.push(html);
    let mut config = base_config();
    config.html_pct = 100;
    config.num_emails = 5;

    let mut writer = VecWriter::default();
    run(&config, &pools, &mut writer).unwrap();

    for (_, bytes) in &writer.files {
        let parsed = mail_parser::MessageParser::default().parse(bytes).unwrap();
        assert!(!parsed.html_body.is_empty());
        assert_eq!(
            parsed.body_text(0).unwrap().trim_end(),
            "Hello world",
            "the plain-text pool supplies the fallback part"
        );
        assert_eq!(parsed.subject(), Some("Team news All hands on Friday"));
    }
}

#[test]
fn test_stripped_html_fallback_when_text_pool_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut pools = pools_with(dir.path());
    pools.text_bodies.clear();
    let html = dir.path().join("memo.html");
    fs::write(&html, "<p>Printer is <b>on fire</b></p>").unwrap();
    pools.html_bodies.push(html);
    let mut config = base_config();
    config.html_pct = 0;

    let mut writer = VecWriter::default();
    run(&config, &pools, &mut writer).unwrap();

    for (_, bytes) in &writer.files {
        let parsed = mail_parser::MessageParser::default().parse(bytes).unwrap();
        assert!(parsed.html_body.is_empty());
        assert_eq!(parsed.body_text(0).unwrap().trim_end(), "Printer is on fire");
    }
}
