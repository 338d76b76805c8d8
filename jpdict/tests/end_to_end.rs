//! End-to-end scenarios against a real (mocked) HTTP origin and a real
//! on-disk store, covering spec.md §8's "Fresh install" and `getNames`
//! scenarios through the public `Database` facade.

use jpdict::{Database, Series, SeriesSet};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ljson_body(lines: &[&str]) -> String {
    lines.join("\n") + "\n"
}

#[tokio::test]
async fn fresh_install_populates_kanji_with_resolved_radical_and_components() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jpdict-rc-en-version.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kanji": {"1": {"major":1,"minor":0,"patch":0,"snapshot":0,"dateOfCreation":"2024-01-01"}},
            "radicals": {"1": {"major":1,"minor":0,"patch":0,"snapshot":0,"dateOfCreation":"2024-01-01"}},
        })))
        .mount(&server)
        .await;

    let radicals_body = ljson_body(&[
        r#"{"type":"header","version":{"major":1,"minor":0,"patch":0,"dateOfCreation":"2024-01-01"},"records":1}"#,
        r#"{"id":"057","rad":57,"b":"弓","k":"弓","r":["ゆみへん"],"m":["bow"]}"#,
    ]);
    Mock::given(method("GET"))
        .and(path("/radicals-rc-en-1.0.0-full.ljson"))
        .respond_with(ResponseTemplate::new(200).set_body_string(radicals_body))
        .mount(&server)
        .await;

    let kanji_body = ljson_body(&[
        r#"{"type":"header","version":{"major":1,"minor":0,"patch":0,"dateOfCreation":"2024-01-01"},"records":1}"#,
        r#"{"c":24341,"r":{"on":["イン"],"kun":["ひ.く"],"na":[]},"m":["pull","tug"],"rad":{"x":57,"var":[]},"comp":"弓弓","refs":{}}"#,
    ]);
    Mock::given(method("GET"))
        .and(path("/kanji-rc-en-1.0.0-full.ljson"))
        .respond_with(ResponseTemplate::new(200).set_body_string(kanji_body))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base_url = format!("{}/", server.uri());
    let db = Database::open(dir.path(), base_url).await.unwrap();

    db.update(Some(SeriesSet { series: vec![Series::Kanji] }), "en")
        .await
        .unwrap();

    let status = db.status(Series::Kanji);
    assert_eq!(status.version.unwrap().triple(), (1, 0, 0));
    // Requesting kanji implicitly pulled in radicals (spec.md §4.5 `update`).
    assert!(db.status(Series::Radicals).version.is_some());

    let results = db.get_kanji(&['引'], "en").await.unwrap();
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.rad.b, "弓");
    assert_eq!(result.rad.k.as_deref(), Some("弓"));
    assert!(result.rad.base.is_none());
    assert_eq!(result.comp.len(), 2);
    for component in &result.comp {
        assert_eq!(component.k.as_deref(), Some("弓"));
        assert_eq!(component.m, vec!["bow".to_string()]);
    }
}

#[tokio::test]
async fn redundant_overlapping_update_calls_resolve_to_the_same_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jpdict-rc-en-version.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "radicals": {"1": {"major":1,"minor":0,"patch":0,"snapshot":0,"dateOfCreation":"2024-01-01"}},
        })))
        .mount(&server)
        .await;

    let radicals_body = ljson_body(&[
        r#"{"type":"header","version":{"major":1,"minor":0,"patch":0,"dateOfCreation":"2024-01-01"},"records":1}"#,
        r#"{"id":"057","rad":57,"b":"弓","r":[],"m":[]}"#,
    ]);
    Mock::given(method("GET"))
        .and(path("/radicals-rc-en-1.0.0-full.ljson"))
        .respond_with(ResponseTemplate::new(200).set_body_string(radicals_body))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base_url = format!("{}/", server.uri());
    let db = Database::open(dir.path(), base_url).await.unwrap();

    let set = SeriesSet { series: vec![Series::Radicals] };
    let (a, b) = tokio::join!(db.update(Some(set.clone()), "en"), db.update(Some(set), "en"));
    assert!(a.is_ok());
    assert!(b.is_ok());
}

#[tokio::test]
async fn get_names_ranks_exact_matches_before_kana_equivalent_ones() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jpdict-rc-en-version.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "names": {"1": {"major":1,"minor":0,"patch":0,"snapshot":0,"dateOfCreation":"2024-01-01"}},
        })))
        .mount(&server)
        .await;

    let names_body = ljson_body(&[
        r#"{"type":"header","version":{"major":1,"minor":0,"patch":0,"dateOfCreation":"2024-01-01"},"records":2}"#,
        r#"{"id":1,"k":["中野"],"r":["なかの"],"tr":[]}"#,
        r#"{"id":2,"k":[],"r":["ナカノ"],"tr":[]}"#,
    ]);
    Mock::given(method("GET"))
        .and(path("/names-rc-en-1.0.0-full.ljson"))
        .respond_with(ResponseTemplate::new(200).set_body_string(names_body))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base_url = format!("{}/", server.uri());
    let db = Database::open(dir.path(), base_url).await.unwrap();
    db.update(Some(SeriesSet { series: vec![Series::Names] }), "en")
        .await
        .unwrap();

    let result = db.get_names("なかの").unwrap();
    assert_eq!(result.matches.len(), 2);
    assert_eq!(result.matches[0].record.id, 1);
    assert_eq!(result.matches[1].record.id, 2);
}
