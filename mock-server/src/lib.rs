//! In-memory stand-in for the pCloud API.
//!
//! Serves the subset of methods the client's integration tests drive:
//! folder management, multipart and chunked uploads, `stat`, and the binary
//! downloads. Like the real service it answers API failures with HTTP 200
//! and a non-zero `result` code; only unknown methods get a 404.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Multipart, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const ROOT_FOLDER_ID: u64 = 0;

/// Largest file an upload session may grow to.
pub const MAX_UPLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Bytes served by `getthumb` in place of a rendered image.
pub const THUMB_PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, b'I', b'H', b'D', b'R',
];

/// Item metadata as the API reports it.
#[derive(Clone, Debug, Serialize)]
pub struct Metadata {
    pub name: String,
    pub isfolder: bool,
    pub parentfolderid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folderid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fileid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<Metadata>>,
}

#[derive(Debug)]
struct Folder {
    name: String,
    parent: u64,
}

#[derive(Debug)]
struct StoredFile {
    name: String,
    parent: u64,
    content: Vec<u8>,
}

#[derive(Debug)]
pub struct Store {
    next_id: u64,
    folders: HashMap<u64, Folder>,
    files: HashMap<u64, StoredFile>,
    uploads: HashMap<u64, Vec<u8>>,
}

impl Default for Store {
    fn default() -> Self {
        let mut folders = HashMap::new();
        folders.insert(
            ROOT_FOLDER_ID,
            Folder {
                name: "/".to_string(),
                parent: ROOT_FOLDER_ID,
            },
        );
        Self {
            next_id: 1,
            folders,
            files: HashMap::new(),
            uploads: HashMap::new(),
        }
    }
}

impl Store {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn child_folder(&self, parent: u64, name: &str) -> Option<u64> {
        self.folders
            .iter()
            .find(|(id, f)| **id != ROOT_FOLDER_ID && f.parent == parent && f.name == name)
            .map(|(id, _)| *id)
    }

    fn child_file(&self, parent: u64, name: &str) -> Option<u64> {
        self.files
            .iter()
            .find(|(_, f)| f.parent == parent && f.name == name)
            .map(|(id, _)| *id)
    }

    fn folder_by_path(&self, path: &str) -> Option<u64> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(ROOT_FOLDER_ID, |parent, name| self.child_folder(parent, name))
    }

    fn file_by_path(&self, path: &str) -> Option<u64> {
        let (dir, name) = path.rsplit_once('/')?;
        self.child_file(self.folder_by_path(dir)?, name)
    }

    fn create_folder(&mut self, parent: u64, name: &str) -> u64 {
        let id = self.allocate();
        self.folders.insert(
            id,
            Folder {
                name: name.to_string(),
                parent,
            },
        );
        id
    }

    /// Same-named files in the folder are overwritten in place.
    fn put_file(&mut self, parent: u64, name: &str, content: Vec<u8>) -> u64 {
        let id = match self.child_file(parent, name) {
            Some(id) => id,
            None => self.allocate(),
        };
        self.files.insert(
            id,
            StoredFile {
                name: name.to_string(),
                parent,
                content,
            },
        );
        id
    }

    fn is_empty_folder(&self, id: u64) -> bool {
        !self.folders.iter().any(|(child, f)| *child != id && f.parent == id)
            && !self.files.values().any(|f| f.parent == id)
    }

    /// Removes a folder and everything under it; returns (files, folders).
    fn remove_tree(&mut self, id: u64) -> (u64, u64) {
        let children: Vec<u64> = self
            .folders
            .iter()
            .filter(|(child, f)| **child != id && f.parent == id)
            .map(|(child, _)| *child)
            .collect();
        let mut files = 0;
        let mut folders = 1;
        for child in children {
            let (f, d) = self.remove_tree(child);
            files += f;
            folders += d;
        }
        let before = self.files.len();
        self.files.retain(|_, f| f.parent != id);
        files += (before - self.files.len()) as u64;
        self.folders.remove(&id);
        (files, folders)
    }

    fn used_quota(&self) -> u64 {
        self.files.values().map(|f| f.content.len() as u64).sum()
    }

    fn file_meta(&self, id: u64) -> Option<Metadata> {
        let file = self.files.get(&id)?;
        Some(Metadata {
            name: file.name.clone(),
            isfolder: false,
            parentfolderid: file.parent,
            folderid: None,
            fileid: Some(id),
            size: Some(file.content.len() as u64),
            contents: None,
        })
    }

    fn folder_meta(&self, id: u64, depth: Option<usize>, nofiles: bool) -> Option<Metadata> {
        let folder = self.folders.get(&id)?;
        let contents = match depth {
            Some(0) => None,
            _ => {
                let next = depth.map(|d| d - 1);
                let mut items: Vec<Metadata> = self
                    .folders
                    .iter()
                    .filter(|(child, f)| **child != id && f.parent == id)
                    .filter_map(|(child, _)| self.folder_meta(*child, next, nofiles))
                    .collect();
                if !nofiles {
                    items.extend(
                        self.files
                            .iter()
                            .filter(|(_, f)| f.parent == id)
                            .filter_map(|(file, _)| self.file_meta(*file)),
                    );
                }
                items.sort_by(|a, b| a.name.cmp(&b.name));
                Some(items)
            }
        };
        Some(Metadata {
            name: folder.name.clone(),
            isfolder: true,
            parentfolderid: folder.parent,
            folderid: Some(id),
            fileid: None,
            size: None,
            contents,
        })
    }
}

pub type Db = Arc<RwLock<Store>>;

type QueryMap = HashMap<String, String>;
type ApiResult = Result<Json<Value>, Json<Value>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/userinfo", get(userinfo))
        .route("/listtokens", get(listtokens))
        .route("/createfolder", get(createfolder))
        .route("/createfolderifnotexists", get(createfolderifnotexists))
        .route("/listfolder", get(listfolder))
        .route("/deletefolder", get(deletefolder))
        .route("/deletefolderrecursive", get(deletefolderrecursive))
        .route("/uploadfile", post(uploadfile))
        .route("/stat", get(stat))
        .route("/deletefile", get(deletefile))
        .route("/gettextfile", get(gettextfile))
        .route("/getthumb", get(getthumb))
        .route("/upload_create", get(upload_create))
        .route("/upload_write", put(upload_write))
        .route("/upload_save", get(upload_save))
        .route_layer(middleware::from_fn(require_token))
        .fallback(unknown_method)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn api_error(result: u32, message: &str) -> Json<Value> {
    Json(json!({ "result": result, "error": message }))
}

fn flag(q: &QueryMap, key: &str) -> bool {
    q.get(key).is_some_and(|v| v != "0")
}

fn number(q: &QueryMap, key: &str) -> Result<Option<u64>, Json<Value>> {
    q.get(key)
        .map(|v| v.parse().map_err(|_| api_error(1004, &format!("Invalid '{key}' provided."))))
        .transpose()
}

fn folder_id(store: &Store, q: &QueryMap) -> Result<u64, Json<Value>> {
    let missing = || api_error(2005, "Directory does not exist.");
    if let Some(id) = number(q, "folderid")? {
        return store.folders.contains_key(&id).then_some(id).ok_or_else(missing);
    }
    match q.get("path") {
        Some(path) => store.folder_by_path(path).ok_or_else(missing),
        None => Err(api_error(1002, "No full path or folderid provided.")),
    }
}

fn file_id(store: &Store, q: &QueryMap) -> Result<u64, Json<Value>> {
    let missing = || api_error(2009, "File not found.");
    if let Some(id) = number(q, "fileid")? {
        return store.files.contains_key(&id).then_some(id).ok_or_else(missing);
    }
    match q.get("path") {
        Some(path) => store.file_by_path(path).ok_or_else(missing),
        None => Err(api_error(1004, "No fileid or path provided.")),
    }
}

/// Parent folder and new name from `path`, or from `folderid` plus `name`.
fn parent_and_name(store: &Store, q: &QueryMap) -> Result<(u64, String), Json<Value>> {
    let (parent, name) = match q.get("path") {
        Some(path) => {
            let (dir, name) = path
                .trim_end_matches('/')
                .rsplit_once('/')
                .ok_or_else(|| api_error(2001, "Invalid file/folder name."))?;
            let parent = store
                .folder_by_path(dir)
                .ok_or_else(|| api_error(2002, "A component of parent directory does not exist."))?;
            (parent, name.to_string())
        }
        None => (folder_id(store, q)?, q.get("name").cloned().unwrap_or_default()),
    };
    if name.is_empty() || name.contains('/') {
        return Err(api_error(2001, "Invalid file/folder name."));
    }
    Ok((parent, name))
}

async fn require_token(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty());
    if !authorized {
        return api_error(1000, "Log in required.").into_response();
    }
    next.run(request).await
}

async fn unknown_method() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, api_error(2000, "Invalid API method."))
}

async fn userinfo(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({
        "result": 0,
        "userid": 1,
        "email": "mock@pcloud.test",
        "emailverified": true,
        "quota": 10u64 << 30,
        "usedquota": store.used_quota(),
    }))
}

async fn listtokens() -> Json<Value> {
    Json(json!({
        "result": 0,
        "tokens": [{ "tokenid": 1, "device": "mock-server", "current": true }],
    }))
}

async fn create(db: &Db, q: &QueryMap, if_not_exists: bool) -> ApiResult {
    let mut store = db.write().await;
    let (parent, name) = parent_and_name(&store, q)?;
    let (id, created) = match store.child_folder(parent, &name) {
        Some(existing) if if_not_exists => (existing, false),
        Some(_) => return Err(api_error(2004, "File or folder alredy exists.")),
        None => (store.create_folder(parent, &name), true),
    };
    debug!(id, parent, name = %name, created, "createfolder");
    let metadata = store.folder_meta(id, Some(0), false);
    Ok(Json(json!({ "result": 0, "created": created, "metadata": metadata })))
}

async fn createfolder(State(db): State<Db>, Query(q): Query<QueryMap>) -> ApiResult {
    create(&db, &q, false).await
}

async fn createfolderifnotexists(State(db): State<Db>, Query(q): Query<QueryMap>) -> ApiResult {
    create(&db, &q, true).await
}

async fn listfolder(State(db): State<Db>, Query(q): Query<QueryMap>) -> ApiResult {
    let store = db.read().await;
    let id = folder_id(&store, &q)?;
    let depth = if flag(&q, "recursive") { None } else { Some(1) };
    let metadata = store.folder_meta(id, depth, flag(&q, "nofiles"));
    Ok(Json(json!({ "result": 0, "metadata": metadata })))
}

async fn deletefolder(State(db): State<Db>, Query(q): Query<QueryMap>) -> ApiResult {
    let mut store = db.write().await;
    let id = folder_id(&store, &q)?;
    if id == ROOT_FOLDER_ID {
        return Err(api_error(2003, "Access denied."));
    }
    if !store.is_empty_folder(id) {
        return Err(api_error(2006, "Folder is not empty."));
    }
    let metadata = store.folder_meta(id, Some(0), false);
    store.folders.remove(&id);
    Ok(Json(json!({ "result": 0, "metadata": metadata })))
}

async fn deletefolderrecursive(State(db): State<Db>, Query(q): Query<QueryMap>) -> ApiResult {
    let mut store = db.write().await;
    let id = folder_id(&store, &q)?;
    if id == ROOT_FOLDER_ID {
        return Err(api_error(2003, "Access denied."));
    }
    let (files, folders) = store.remove_tree(id);
    Ok(Json(json!({ "result": 0, "deletedfiles": files, "deletedfolders": folders })))
}

async fn uploadfile(State(db): State<Db>, Query(q): Query<QueryMap>, mut multipart: Multipart) -> ApiResult {
    let mut received = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(5000, &e.to_string()))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await.map_err(|e| api_error(5000, &e.to_string()))?;
        received.push((name, data.to_vec()));
    }

    let mut store = db.write().await;
    let folder = if q.contains_key("folderid") || q.contains_key("path") {
        folder_id(&store, &q)?
    } else {
        ROOT_FOLDER_ID
    };
    let mut fileids = Vec::new();
    let mut metadata = Vec::new();
    for (name, data) in received {
        let id = store.put_file(folder, &name, data);
        fileids.push(id);
        metadata.extend(store.file_meta(id));
    }
    debug!(folder, count = fileids.len(), "uploadfile");
    Ok(Json(json!({ "result": 0, "fileids": fileids, "metadata": metadata })))
}

async fn stat(State(db): State<Db>, Query(q): Query<QueryMap>) -> ApiResult {
    let store = db.read().await;
    let id = file_id(&store, &q)?;
    Ok(Json(json!({ "result": 0, "metadata": store.file_meta(id) })))
}

async fn deletefile(State(db): State<Db>, Query(q): Query<QueryMap>) -> ApiResult {
    let mut store = db.write().await;
    let id = file_id(&store, &q)?;
    let metadata = store.file_meta(id);
    store.files.remove(&id);
    Ok(Json(json!({ "result": 0, "metadata": metadata })))
}

async fn gettextfile(State(db): State<Db>, Query(q): Query<QueryMap>) -> Response {
    let store = db.read().await;
    match file_id(&store, &q) {
        Ok(id) => {
            let content = store.files.get(&id).map(|f| f.content.clone()).unwrap_or_default();
            ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn getthumb(State(db): State<Db>, Query(q): Query<QueryMap>) -> Response {
    if !q.contains_key("size") {
        return api_error(1006, "Please provide 'size'.").into_response();
    }
    let store = db.read().await;
    match file_id(&store, &q) {
        Ok(_) => ([(header::CONTENT_TYPE, "image/png")], THUMB_PNG).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn upload_create(State(db): State<Db>) -> Json<Value> {
    let mut store = db.write().await;
    let id = store.allocate();
    store.uploads.insert(id, Vec::new());
    Json(json!({ "result": 0, "uploadid": id }))
}

fn upload_id(store: &Store, q: &QueryMap) -> Result<u64, Json<Value>> {
    number(q, "uploadid")?
        .filter(|id| store.uploads.contains_key(id))
        .ok_or_else(|| api_error(1900, "Invalid upload id."))
}

async fn upload_write(State(db): State<Db>, Query(q): Query<QueryMap>, body: Bytes) -> ApiResult {
    let mut store = db.write().await;
    let id = upload_id(&store, &q)?;
    let invalid = || api_error(1004, "Invalid 'uploadoffset' provided.");
    let offset = usize::try_from(number(&q, "uploadoffset")?.unwrap_or(0)).map_err(|_| invalid())?;
    let end = offset
        .checked_add(body.len())
        .filter(|&end| end <= MAX_UPLOAD_SIZE)
        .ok_or_else(invalid)?;
    if let Some(buffer) = store.uploads.get_mut(&id) {
        if buffer.len() < end {
            buffer.resize(end, 0);
        }
        buffer[offset..end].copy_from_slice(&body);
    }
    Ok(Json(json!({ "result": 0 })))
}

async fn upload_save(State(db): State<Db>, Query(q): Query<QueryMap>) -> ApiResult {
    let mut store = db.write().await;
    let id = upload_id(&store, &q)?;
    let (folder, name) = parent_and_name(&store, &q)?;
    let content = store.uploads.remove(&id).unwrap_or_default();
    let fileid = store.put_file(folder, &name, content);
    Ok(Json(json!({ "result": 0, "metadata": store.file_meta(fileid) })))
}
