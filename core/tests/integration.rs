//! End-to-end tests against the mock pCloud server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread, then
//! drives the real `ReqwestTransport` over HTTP. Validates that parameter
//! encoding, multipart and raw-body uploads, binary downloads and the
//! checked error path all line up with an actual server.

use std::io::Write;
use std::net::SocketAddr;

use pcloud_core::api::file::UploadFile;
use pcloud_core::api::folder::{CreateFolder, ListFolder};
use pcloud_core::api::streaming::TextOptions;
use pcloud_core::api::thumbnails::ThumbOptions;
use pcloud_core::{ApiError, ClientConfig, FilePart, Locator, PCloudClient};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::default().with_base_url(&format!("http://{addr}/"))
}

fn client(addr: SocketAddr) -> PCloudClient {
    PCloudClient::new(config(addr).with_access_token("integration-token")).unwrap()
}

#[test]
fn folder_lifecycle() {
    let addr = start_server();
    let c = client(addr);

    let created = c.createfolder(&CreateFolder::at_path("/Projects")).unwrap();
    assert_eq!(created["result"], 0);
    let id = created["metadata"]["folderid"].as_u64().unwrap();

    c.createfolderifnotexists(&CreateFolder::in_folder(id, "Drafts"))
        .unwrap();
    let again = c
        .createfolderifnotexists(&CreateFolder::in_folder(id, "Drafts"))
        .unwrap();
    assert_eq!(again["created"], false);

    // Plain json calls hand back API failures untouched.
    let conflict = c.createfolder(&CreateFolder::at_path("/Projects")).unwrap();
    assert_eq!(conflict["result"], 2004);

    let listing = c
        .listfolder(&ListFolder {
            recursive: true,
            ..ListFolder::new(0u64)
        })
        .unwrap();
    let projects = &listing["metadata"]["contents"][0];
    assert_eq!(projects["name"], "Projects");
    assert_eq!(projects["contents"][0]["name"], "Drafts");

    let not_empty = c.deletefolder(id).unwrap();
    assert_eq!(not_empty["result"], 2006);

    let deleted = c.deletefolderrecursive("/Projects").unwrap();
    assert_eq!(deleted["deletedfolders"], 2);

    let gone = c.listfolder(&ListFolder::new(Locator::by_id(id))).unwrap();
    assert_eq!(gone["result"], 2005);
}

#[test]
fn upload_stat_and_download() {
    let addr = start_server();
    let c = client(addr);

    let mut local = tempfile::NamedTempFile::new().unwrap();
    local.write_all(b"first line\nsecond line\n").unwrap();

    c.createfolder(&CreateFolder::at_path("/Docs")).unwrap();
    let uploaded = c
        .uploadfile(&UploadFile::new(
            "/Docs",
            vec![FilePart::new(local.path()).with_filename("notes.txt")],
        ))
        .unwrap();
    assert_eq!(uploaded["result"], 0);
    let fileid = uploaded["fileids"][0].as_u64().unwrap();

    let stat = c.stat("/Docs/notes.txt").unwrap();
    assert_eq!(stat["metadata"]["fileid"], fileid);
    assert_eq!(stat["metadata"]["size"], 23);

    let text = c.gettextfile(fileid, &TextOptions::default()).unwrap();
    assert_eq!(text, b"first line\nsecond line\n");

    let thumb = c.getthumb(fileid, &ThumbOptions::new("64x64")).unwrap();
    assert_eq!(thumb, mock_server::THUMB_PNG);
}

#[test]
fn chunked_upload() {
    let addr = start_server();
    let c = client(addr);

    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let saved = c.upload_bytes("blob.bin", 0, &data, 300).unwrap();
    assert_eq!(saved["metadata"]["size"], 1000);

    let stat = c.stat("/blob.bin").unwrap();
    assert_eq!(stat["metadata"]["name"], "blob.bin");
}

#[test]
fn checked_call_without_token() {
    let addr = start_server();
    let anonymous = PCloudClient::new(config(addr)).unwrap();

    match anonymous.userinfo() {
        Err(ApiError::Api {
            context,
            result,
            error,
        }) => {
            assert_eq!(context, "userinfo");
            assert_eq!(result, 1000);
            assert_eq!(error, "Log in required.");
        }
        other => panic!("expected login error, got {other:?}"),
    }

    let info = client(addr).userinfo().unwrap();
    assert_eq!(info["email"], "mock@pcloud.test");
    assert_eq!(client(addr).listtokens().unwrap()[0]["device"], "mock-server");
}

#[test]
fn unknown_method_is_http_error() {
    let addr = start_server();
    let c = client(addr);
    let err = c.getfilelink(1u64, &Default::default()).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 404, .. }));
}

#[test]
fn missing_upload_source_is_io_error() {
    let addr = start_server();
    let c = client(addr);
    let err = c
        .uploadfile(&UploadFile::new(
            0u64,
            vec![FilePart::new("/definitely/not/here.bin")],
        ))
        .unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
}
