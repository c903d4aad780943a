use sp_compactor::normalize::{char_len, normalize};
use sp_compactor::{classify, compress, CompactorPipeline, ContentKind};

fn samples() -> Vec<String> {
    let mut out = vec![
        String::new(),
        "hi".to_string(),
        r#"{"level":"ERROR"}"#.to_string(),
        "INFO: a\nINFO: b".to_string(),
        "a,b\n1,2\n3,4".to_string(),
        "def f():\n    return 1".to_string(),
        "```\nx\n```".to_string(),
        "Title\nshort".to_string(),
        "{broken".to_string(),
        "caf\u{e9} cr\u{e8}me br\u{fb}l\u{e9}e\nna\u{ef}ve r\u{e9}sum\u{e9}".to_string(),
    ];
    let rows: Vec<String> = (0..50).map(|i| format!("{},{},{}", i, i * 2, i * 3)).collect();
    out.push(format!("a,b,c\n{}", rows.join("\n")));
    let items: Vec<String> = (0..40).map(|i| format!("{{\"id\":{},\"tags\":[\"x\",\"y\"]}}", i)).collect();
    out.push(format!("[{}]", items.join(",")));
    out
}

#[test]
fn size_never_grows() {
    for input in samples() {
        let r = compress(&input);
        assert!(r.stats.chars_out <= char_len(&input), "grew: {:?}", input);
        assert_eq!(r.stats.chars_out, char_len(&r.compressed), "stats mismatch: {:?}", input);
        assert!(
            r.stats.chars_out < r.stats.chars_in
                || r.compressed == normalize(&input)
                || r.compressed.is_empty()
        );
    }
}

#[test]
fn classification_is_deterministic() {
    for input in samples() {
        assert_eq!(classify(&input), classify(&input));
    }
}

#[test]
fn traceback_log_keeps_essentials() {
    let input = "2024-01-01 10:00:00 ERROR: boom\n\
2024-01-01 10:00:01 ERROR: still broken\n\
Traceback (most recent call last):\n\
INFO: worker heartbeat\n  \
File \"a.py\", line 1\n\
INFO: worker heartbeat ok\n\
ValueError: bad";
    assert_eq!(classify(input), ContentKind::Log);

    let r = CompactorPipeline::default().compress(input);
    assert_eq!(r.detected_type, ContentKind::Log);
    assert!(r.compressed.contains("Traceback (most recent call last):"));
    assert!(r.compressed.contains("File \"a.py\", line 1"));
    assert!(r.compressed.contains("ValueError: bad"));
    assert!(!r.compressed.contains("INFO:"));
    assert!(r.note.is_none());
}

#[test]
fn large_json_array_is_sampled() {
    let items: Vec<String> = (0..40).map(|i| format!("{{\"id\":{},\"tags\":[\"x\",\"y\"]}}", i)).collect();
    let r = compress(&format!("[{}]", items.join(",")));
    assert_eq!(r.detected_type, ContentKind::Json);
    assert!(r.compressed.contains("\"count\":40"));
    assert!(r.compressed.contains("\"id\":20"));
    assert!(r.compressed.contains("\"id\":39"));
}
