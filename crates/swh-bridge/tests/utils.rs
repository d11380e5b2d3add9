#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{
    Method, Request, Response, StatusCode,
    body::Incoming,
    header::AUTHORIZATION,
    server::conn::http1::Builder,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use reqwest::Url;
use serde_json::{Map, Value, json};
use swh_bridge::{Bridge, config::BridgeConfig};
use swh_bridge_core::{
    Key, ObjectFormat, ObjectKind, Swhid, TypedHash,
    hash::{Digest, HashAlgorithm},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Builds a raw Git object, returning its digest and bytes.
pub fn git_object(kind: &str, body: &[u8]) -> (Digest, Vec<u8>) {
    let mut data = format!("{} {}\0", kind, body.len()).into_bytes();
    data.extend_from_slice(body);
    (HashAlgorithm::Sha1.digest(&data), data)
}

pub fn datastore_key(digest: &Digest) -> Key {
    let hash = TypedHash::new(ObjectFormat::GitRaw, *digest);
    Key::from_multihash(&hash.to_multihash().unwrap())
}

/// An in-memory stand-in for the archive's `known` and `raw` endpoints.
#[derive(Default)]
pub struct MockArchive {
    objects: HashMap<String, Vec<u8>>,
    /// Known, but gone by the time they are fetched.
    vanished: HashSet<String>,
    known_status: Option<StatusCode>,
    raw_status: Option<StatusCode>,

    pub known_requests: AtomicUsize,
    pub raw_requests: AtomicUsize,
    pub probed: Mutex<Vec<Vec<String>>>,
    pub fetched: Mutex<Vec<String>>,
    pub authorization: Mutex<Vec<Option<String>>>,
}

impl MockArchive {
    pub fn with_object(mut self, swhid: Swhid, data: Vec<u8>) -> Self {
        self.objects.insert(swhid.to_string(), data);
        self
    }

    pub fn with_vanished(mut self, swhid: Swhid) -> Self {
        self.vanished.insert(swhid.to_string());
        self
    }

    pub fn with_known_status(mut self, status: StatusCode) -> Self {
        self.known_status = Some(status);
        self
    }

    pub fn with_raw_status(mut self, status: StatusCode) -> Self {
        self.raw_status = Some(status);
        self
    }

    pub fn known_requests(&self) -> usize {
        self.known_requests.load(Ordering::SeqCst)
    }

    pub fn raw_requests(&self) -> usize {
        self.raw_requests.load(Ordering::SeqCst)
    }

    fn is_known(&self, swhid: &str) -> bool {
        self.objects.contains_key(swhid) || self.vanished.contains(swhid)
    }

    /// Serves the archive on a free local port, returning its base URL.
    pub async fn serve(self) -> (Arc<Self>, Url) {
        let archive = Arc::new(self);

        let port = port_check::free_local_port().unwrap();
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = TcpListener::bind(addr).await.unwrap();

        let state = archive.clone();

        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                let io = TokioIo::new(stream);
                let state = state.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(state.clone(), req));

                    if let Err(e) = Builder::new().serve_connection(io, service).await {
                        warn!("Error serving connection: {:?}", e);
                    }
                });
            }
        });

        let url = Url::parse(&format!("http://{}", addr)).unwrap();
        info!("Serving mock archive at {}", url);

        (archive, url)
    }
}

async fn handle(
    archive: Arc<MockArchive>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let auth = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    archive.authorization.lock().unwrap().push(auth);

    let path = req.uri().path().to_string();

    if req.method() == Method::POST && path == "/api/1/known/" {
        archive.known_requests.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = archive.known_status {
            return Ok(status_response(status));
        }

        let body = req.into_body().collect().await?.to_bytes();
        let ids: Vec<String> = serde_json::from_slice(&body).unwrap();
        archive.probed.lock().unwrap().push(ids.clone());

        let reply: Map<String, Value> = ids
            .into_iter()
            .map(|id| {
                let known = archive.is_known(&id);
                (id, json!({ "known": known }))
            })
            .collect();

        let body = serde_json::to_vec(&reply).unwrap();
        return Ok(Response::new(Full::new(Bytes::from(body))));
    }

    if req.method() == Method::GET {
        if let Some(id) = path
            .strip_prefix("/api/1/raw/")
            .and_then(|p| p.strip_suffix('/'))
        {
            archive.raw_requests.fetch_add(1, Ordering::SeqCst);
            archive.fetched.lock().unwrap().push(id.to_string());

            if let Some(status) = archive.raw_status {
                return Ok(status_response(status));
            }

            return Ok(match archive.objects.get(id) {
                Some(data) => Response::new(Full::new(Bytes::from(data.clone()))),
                None => status_response(StatusCode::NOT_FOUND),
            });
        }
    }

    Ok(status_response(StatusCode::NOT_FOUND))
}

fn status_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::new()));
    *res.status_mut() = status;
    res
}

/// Accepts connections and never answers, returning the server's base URL.
pub async fn serve_unresponsive() -> Url {
    let port = port_check::free_local_port().unwrap();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        let mut open = Vec::new();

        loop {
            let (stream, _) = listener.accept().await.unwrap();
            open.push(stream);
        }
    });

    Url::parse(&format!("http://{}", addr)).unwrap()
}

pub fn init_bridge(base_url: Url) -> Bridge {
    Bridge::new(BridgeConfig::new(base_url)).unwrap()
}

pub fn swhid(kind: ObjectKind, digest: &Digest) -> Swhid {
    Swhid::new(kind, *digest)
}
