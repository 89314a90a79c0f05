//! Shared utilities for integration testing: PEM fixtures and an mTLS
//! JSON-RPC mock signer.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::consensus::{SignableTransaction, TxEnvelope, TypedTransaction};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{hex, Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig, SupportedProtocolVersion};
use serde_json::{json, Value};

use remote_signer_client::config::TlsConfig;
use remote_signer_client::SigningRequest;

/// Well-known development key (first Anvil/Hardhat account).
pub const SIGNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Client TLS material for one of the fixture pairs (`client-a`, `client-b`, `rogue`).
pub fn tls_config(client: &str) -> TlsConfig {
    TlsConfig {
        ca_cert: fixture("ca.crt"),
        cert: fixture(&format!("{client}.crt")),
        key: fixture(&format!("{client}.key")),
    }
}

/// Copy a fixture pair into `dir` as `tls.crt`/`tls.key`.
pub fn install_pair(dir: &Path, client: &str) {
    fs::copy(fixture(&format!("{client}.crt")), dir.join("tls.crt")).unwrap();
    fs::copy(fixture(&format!("{client}.key")), dir.join("tls.key")).unwrap();
}

pub fn leaf_der(client: &str) -> Vec<u8> {
    let pem = fs::read(fixture(&format!("{client}.crt"))).unwrap();
    let cert = rustls_pemfile::certs(&mut pem.as_slice())
        .next()
        .unwrap()
        .unwrap();
    cert.as_ref().to_vec()
}

pub fn signer() -> PrivateKeySigner {
    SIGNER_KEY.parse().unwrap()
}

/// Which protocol versions the mock signer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerTls {
    Tls13,
    Tls12Only,
}

/// Behaviour knobs and observations of the mock signer.
#[derive(Debug)]
pub struct MockState {
    pub version: String,
    pub health_requests: AtomicUsize,
    pub sign_requests: AtomicUsize,
    pub last_params: Mutex<Option<Value>>,
    /// When set, `eth_signTransaction` fails with this message.
    pub reject: Mutex<Option<String>>,
    /// When set, returned verbatim as the `eth_signTransaction` result.
    pub raw_result: Mutex<Option<Value>>,
    pub health_delay: Mutex<Duration>,
    pub sign_delay: Mutex<Duration>,
}

impl MockState {
    fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            health_requests: AtomicUsize::new(0),
            sign_requests: AtomicUsize::new(0),
            last_params: Mutex::new(None),
            reject: Mutex::new(None),
            raw_result: Mutex::new(None),
            health_delay: Mutex::new(Duration::ZERO),
            sign_delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn sign_count(&self) -> usize {
        self.sign_requests.load(Ordering::SeqCst)
    }

    pub fn health_count(&self) -> usize {
        self.health_requests.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Value {
        self.last_params.lock().unwrap().clone().unwrap()[0].clone()
    }
}

/// A running mock signer; shuts down on drop.
pub struct MockSigner {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
    handle: Handle,
}

impl MockSigner {
    pub async fn start() -> Self {
        Self::start_with(ServerTls::Tls13, "v1.2.3").await
    }

    pub async fn start_with(tls: ServerTls, version: &str) -> Self {
        Self::start_configured(tls, version, |_| {}).await
    }

    /// Start with state adjusted by `configure` before the first request.
    pub async fn start_configured<F>(tls: ServerTls, version: &str, configure: F) -> Self
    where
        F: FnOnce(&MockState),
    {
        let state = Arc::new(MockState::new(version));
        configure(&state);

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new()
            .route("/", post(handle_rpc))
            .with_state(state.clone());

        let config = RustlsConfig::from_config(Arc::new(server_tls_config(tls)));
        let handle = Handle::new();
        let server = axum_server::from_tcp_rustls(listener, config)
            .handle(handle.clone())
            .serve(app.into_make_service());
        tokio::spawn(async move {
            let _ = server.await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("https://127.0.0.1:{}", self.addr.port())
    }
}

impl Drop for MockSigner {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

fn server_tls_config(tls: ServerTls) -> ServerConfig {
    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let ca = fs::read(fixture("ca.crt")).unwrap();
    let mut roots = RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut ca.as_slice()) {
        roots.add(cert.unwrap()).unwrap();
    }
    let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider.clone())
        .build()
        .unwrap();

    let cert_pem = fs::read(fixture("server.crt")).unwrap();
    let certs = rustls_pemfile::certs(&mut cert_pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let key_pem = fs::read(fixture("server.key")).unwrap();
    let key = rustls_pemfile::private_key(&mut key_pem.as_slice())
        .unwrap()
        .unwrap();

    let versions: &[&'static SupportedProtocolVersion] = match tls {
        ServerTls::Tls13 => &[&rustls::version::TLS13],
        ServerTls::Tls12Only => &[&rustls::version::TLS12],
    };

    let mut config = ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(versions)
        .unwrap()
        .with_client_cert_verifier(verifier)
        .with_single_cert(certs, key)
        .unwrap();
    config.alpn_protocols = vec![b"http/1.1".to_vec()];
    config
}

async fn handle_rpc(State(state): State<Arc<MockState>>, Json(req): Json<Value>) -> Json<Value> {
    let id = req["id"].clone();
    let method = req["method"].as_str().unwrap_or_default();

    let outcome = match method {
        "health_status" => {
            state.health_requests.fetch_add(1, Ordering::SeqCst);
            let delay = *state.health_delay.lock().unwrap();
            tokio::time::sleep(delay).await;
            Ok(json!(state.version))
        }
        "eth_signTransaction" => {
            state.sign_requests.fetch_add(1, Ordering::SeqCst);
            *state.last_params.lock().unwrap() = Some(req["params"].clone());
            let delay = *state.sign_delay.lock().unwrap();
            tokio::time::sleep(delay).await;
            sign(&state, &req["params"])
        }
        other => Err((-32601, format!("the method {other} does not exist/is not available"))),
    };

    Json(match outcome {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err((code, message)) => {
            json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
        }
    })
}

fn sign(state: &MockState, params: &Value) -> Result<Value, (i64, String)> {
    if let Some(message) = state.reject.lock().unwrap().clone() {
        return Err((-32000, message));
    }
    if let Some(raw) = state.raw_result.lock().unwrap().clone() {
        return Ok(raw);
    }

    let request: SigningRequest =
        serde_json::from_value(params[0].clone()).map_err(|e| (-32602, e.to_string()))?;
    let tx = request.to_transaction().map_err(|e| (-32602, e.to_string()))?;
    let envelope = sign_locally(&signer(), tx);
    Ok(json!(hex::encode_prefixed(envelope.encoded_2718())))
}

/// Sign `tx` with `key` the way the remote signer would.
pub fn sign_locally(key: &PrivateKeySigner, tx: TypedTransaction) -> TxEnvelope {
    fn seal<T: SignableTransaction<Signature>>(key: &PrivateKeySigner, tx: T) -> alloy::consensus::Signed<T> {
        let sig = key.sign_hash_sync(&tx.signature_hash()).unwrap();
        tx.into_signed(sig)
    }

    match tx {
        TypedTransaction::Legacy(tx) => seal(key, tx).into(),
        TypedTransaction::Eip2930(tx) => seal(key, tx).into(),
        TypedTransaction::Eip1559(tx) => seal(key, tx).into(),
        other => panic!("mock signer cannot sign {:?}", other.tx_type()),
    }
}

pub fn signer_address() -> Address {
    signer().address()
}
