use tunegrab::utils::*;

#[test]
fn test_sanitize_filename_keeps_normal_names() {
    assert_eq!(sanitize_filename("Song"), "Song");
    assert_eq!(sanitize_filename("Don't Stop Me Now"), "Don't Stop Me Now");
    assert_eq!(sanitize_filename("日本語タイトル"), "日本語タイトル");
    assert_eq!(sanitize_filename("Ñoño (Remix)"), "Ñoño (Remix)");
}

#[test]
fn test_sanitize_filename_replaces_unsafe_characters() {
    assert_eq!(sanitize_filename("AC/DC"), "AC_DC");
    assert_eq!(sanitize_filename("What?"), "What_");
    assert_eq!(sanitize_filename("A\\B:C*D"), "A_B_C_D");
    assert_eq!(sanitize_filename("Test <> \"quotes\" |"), "Test __ _quotes_ _");
    assert_eq!(sanitize_filename("tab\there"), "tab_here");
}

#[test]
fn test_sanitize_filename_cannot_escape_directory() {
    let name = sanitize_filename("../../etc/passwd");
    assert!(!name.contains('/'));
    assert!(!name.starts_with('.'));

    assert_eq!(sanitize_filename(".hidden"), "hidden");
    assert_eq!(sanitize_filename(".."), "untitled");
}

#[test]
fn test_sanitize_filename_empty_and_long_names() {
    assert_eq!(sanitize_filename(""), "untitled");
    assert_eq!(sanitize_filename("   "), "untitled");
    assert_eq!(sanitize_filename("  padded  "), "padded");

    let long = "x".repeat(500);
    assert_eq!(sanitize_filename(&long).chars().count(), 200);
}

#[test]
fn test_escape_html() {
    assert_eq!(escape_html("plain"), "plain");
    assert_eq!(
        escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
    );
}

#[test]
fn test_cookie_value() {
    let header = "theme=dark; sid=abc123; other=1";
    assert_eq!(cookie_value(header, "sid"), Some("abc123"));
    assert_eq!(cookie_value(header, "theme"), Some("dark"));
    assert_eq!(cookie_value(header, "missing"), None);
    assert_eq!(cookie_value("sidx=1", "sid"), None);
}

#[test]
fn test_random_tokens() {
    let a = generate_session_id();
    let b = generate_session_id();
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(a, b);

    assert_eq!(generate_oauth_state().len(), 16);
}
