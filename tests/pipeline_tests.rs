//! End-to-end tests of the verified-fetch pipeline against a local HTTP server.

use fetchurl::{
    ArchiveFormat, Error, FetchError, FetchOutcome, FetchRequest, PipelineBuilder, Stage,
    UnpackError, Unpacker,
};
use fetchurl::materialize::ReadSeek;
use reqwest::StatusCode;
use std::fs;
use std::io::Read;
use std::path::Path;

mod common;
use common::helpers::*;
use common::server::{Route, TestServer};

#[tokio::test]
async fn test_store_verified_file() {
    let server = TestServer::start(vec![("/hello.txt", Route::ok(HELLO))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("hello.txt");

    let request = FetchRequest::store(&server.url("/hello.txt"), HELLO_SHA256, &destination).unwrap();
    let outcome = create_test_pipeline(temp.path()).run(&request).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Stored(destination.clone()));
    assert_eq!(fs::read(&destination).unwrap(), HELLO);
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_digest_mismatch_writes_nothing() {
    let server = TestServer::start(vec![("/hello.txt", Route::ok(HELLO))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("hello.txt");

    let request = FetchRequest::store(&server.url("/hello.txt"), "deadbeef", &destination).unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    match &err {
        Error::DigestMismatch { expected, actual, .. } => {
            assert_eq!(expected, "deadbeef");
            assert_eq!(actual, HELLO_SHA256);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.stage(), Stage::Comparing);
    assert!(!destination.exists());
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_uppercase_digest_does_not_match() {
    let server = TestServer::start(vec![("/hello.txt", Route::ok(HELLO))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("hello.txt");

    let request = FetchRequest::store(
        &server.url("/hello.txt"),
        &HELLO_SHA256.to_uppercase(),
        &destination,
    )
    .unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    assert!(matches!(err, Error::DigestMismatch { .. }));
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_not_found_is_a_fetch_failure() {
    let server = TestServer::start(vec![]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("missing");

    let request = FetchRequest::store(&server.url("/missing"), HELLO_SHA256, &destination).unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    assert_eq!(err.stage(), Stage::Fetching);
    match err {
        Error::Fetch { source, .. } => {
            assert_eq!(source.status(), Some(StatusCode::NOT_FOUND));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!destination.exists());
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_only_200_counts_as_success() {
    let server = TestServer::start(vec![("/created", Route::status(201, "Created"))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();

    let request =
        FetchRequest::store(&server.url("/created"), HELLO_SHA256, out.path().join("f")).unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch {
            source: FetchError::BadStatus { code },
            ..
        } if code == StatusCode::CREATED
    ));
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop a listener to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let temp = create_temp_dir();
    let out = create_temp_dir();

    let url = format!("http://127.0.0.1:{port}/file");
    let request = FetchRequest::store(&url, HELLO_SHA256, out.path().join("file")).unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch {
            source: FetchError::Transport(_),
            ..
        }
    ));
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_report_only_returns_digest() {
    let archive = create_tar_gz(&[("hello.txt", HELLO)]);
    let expected = sha256_of(&archive);
    let server = TestServer::start(vec![("/archive.tar.gz", Route::ok(archive))]);
    let temp = create_temp_dir();

    let url = server.url("/archive.tar.gz");
    let request = FetchRequest::report(&url).unwrap();
    let outcome = create_test_pipeline(temp.path()).run(&request).await.unwrap();

    match outcome {
        FetchOutcome::Reported { url: reported, digest } => {
            assert_eq!(reported.as_str(), url);
            assert_eq!(digest, expected);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_unpack_tar_gz() {
    let archive = create_tar_gz(&[("bin/tool", b"#!/bin/sh\n"), ("LICENSE", b"MIT")]);
    let digest = sha256_of(&archive);
    let server = TestServer::start(vec![("/tool.tar.gz", Route::ok(archive))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("tool");

    let request = FetchRequest::unpack(&server.url("/tool.tar.gz"), &digest, &destination).unwrap();
    let outcome = create_test_pipeline(temp.path()).run(&request).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Unpacked(destination.clone()));
    assert_eq!(fs::read(destination.join("bin/tool")).unwrap(), b"#!/bin/sh\n");
    assert_eq!(fs::read(destination.join("LICENSE")).unwrap(), b"MIT");
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_unpack_zip() {
    let archive = create_zip(&[("docs/readme.md", b"# readme")]);
    let digest = sha256_of(&archive);
    let server = TestServer::start(vec![("/bundle.zip", Route::ok(archive))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("bundle");

    let request = FetchRequest::unpack(&server.url("/bundle.zip"), &digest, &destination).unwrap();
    create_test_pipeline(temp.path()).run(&request).await.unwrap();

    assert_eq!(fs::read(destination.join("docs/readme.md")).unwrap(), b"# readme");
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_unpack_extensionless_tarball() {
    let archive = create_tar_gz(&[("bin/tool", b"#!/bin/sh\n")]);
    let digest = sha256_of(&archive);
    let server = TestServer::start(vec![("/tarball/v1", Route::ok(archive))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("tool");

    let request = FetchRequest::unpack(&server.url("/tarball/v1"), &digest, &destination).unwrap();
    let outcome = create_test_pipeline(temp.path()).run(&request).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Unpacked(destination.clone()));
    assert_eq!(fs::read(destination.join("bin/tool")).unwrap(), b"#!/bin/sh\n");
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_unpack_corrupt_archive() {
    let body = b"definitely not gzip".to_vec();
    let digest = sha256_of(&body);
    let server = TestServer::start(vec![("/tool.tgz", Route::ok(body))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();

    let request =
        FetchRequest::unpack(&server.url("/tool.tgz"), &digest, out.path().join("tool")).unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    assert_eq!(err.stage(), Stage::Materializing);
    assert!(matches!(
        err,
        Error::Unpack {
            source: UnpackError::ExtractionFailed { .. },
            ..
        }
    ));
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_store_into_directory_fails() {
    let server = TestServer::start(vec![("/hello.txt", Route::ok(HELLO))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();

    let request = FetchRequest::store(&server.url("/hello.txt"), HELLO_SHA256, out.path()).unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    assert_eq!(err.stage(), Stage::Materializing);
    match &err {
        Error::Io { destination, .. } => assert_eq!(destination, out.path()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(out.path().is_dir());
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_truncated_body() {
    let server = TestServer::start(vec![("/hello.txt", Route::truncated(HELLO, 100))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("hello.txt");

    let request = FetchRequest::store(&server.url("/hello.txt"), HELLO_SHA256, &destination).unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    assert_eq!(err.stage(), Stage::Fetching);
    assert!(matches!(
        err,
        Error::Fetch {
            source: FetchError::Body(_),
            ..
        }
    ));
    assert!(!destination.exists());
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_unpack_unsupported_format() {
    let server = TestServer::start(vec![("/hello.txt", Route::ok(HELLO))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("hello");

    let request = FetchRequest::unpack(&server.url("/hello.txt"), HELLO_SHA256, &destination).unwrap();
    let err = create_test_pipeline(temp.path()).run(&request).await.unwrap_err();

    assert_eq!(err.stage(), Stage::Materializing);
    assert!(matches!(
        err,
        Error::Unpack {
            source: UnpackError::UnsupportedFormat { .. },
            ..
        }
    ));
    assert!(!destination.exists());
    assert_dir_empty(temp.path());
}

#[tokio::test]
async fn test_custom_unpacker_receives_verified_content() {
    struct CopyUnpacker;

    impl Unpacker for CopyUnpacker {
        fn detect(
            &self,
            name: &str,
            _source: &mut dyn ReadSeek,
        ) -> std::io::Result<Option<ArchiveFormat>> {
            Ok(name.ends_with(".pkg").then_some(ArchiveFormat::Zip))
        }

        fn extract(
            &self,
            _format: ArchiveFormat,
            source: &mut dyn ReadSeek,
            destination: &Path,
        ) -> Result<(), UnpackError> {
            let mut content = Vec::new();
            source.read_to_end(&mut content)?;
            fs::write(destination.join("payload"), content)?;
            Ok(())
        }
    }

    let server = TestServer::start(vec![("/thing.pkg", Route::ok(HELLO))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("thing");

    let pipeline = PipelineBuilder::hidden()
        .system_proxy(false)
        .temp_dir(temp.path())
        .unpacker(CopyUnpacker)
        .build()
        .unwrap();
    let request = FetchRequest::unpack(&server.url("/thing.pkg"), HELLO_SHA256, &destination).unwrap();
    pipeline.run(&request).await.unwrap();

    assert_eq!(fs::read(destination.join("payload")).unwrap(), HELLO);
}

#[tokio::test]
async fn test_store_overwrites_existing_destination() {
    let server = TestServer::start(vec![("/hello.txt", Route::ok(HELLO))]);
    let temp = create_temp_dir();
    let out = create_temp_dir();
    let destination = out.path().join("hello.txt");
    fs::write(&destination, b"previous, longer content").unwrap();

    let request = FetchRequest::store(&server.url("/hello.txt"), HELLO_SHA256, &destination).unwrap();
    create_test_pipeline(temp.path()).run(&request).await.unwrap();

    assert_eq!(fs::read(&destination).unwrap(), HELLO);
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let server = TestServer::start(vec![("/hello.txt", Route::ok(HELLO))]);
    let temp = create_temp_dir();

    let pipeline = PipelineBuilder::hidden()
        .system_proxy(false)
        .temp_dir(temp.path())
        .header(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("fetchurl-test/1.0"),
        )
        .build()
        .unwrap();
    let request = FetchRequest::report(&server.url("/hello.txt")).unwrap();
    pipeline.run(&request).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].to_lowercase().contains("user-agent: fetchurl-test/1.0"));
}

