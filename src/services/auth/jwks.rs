//! JWKS 공개키 캐시
//!
//! 프로바이더의 JWKS 엔드포인트에서 RSA 공개키를 받아 `kid` 기준으로 보관합니다.
//! TTL이 지나거나 처음 보는 `kid`가 들어오면 다시 받아옵니다.
//! 키 교체(rotation) 직후 새 `kid`로 서명된 토큰도 재시작 없이 검증됩니다.
//!
//! 요청은 성공/실패와 관계없이 `min_refetch_interval`에 한 번만 나가며,
//! 동시에 들어온 검증 요청들은 하나의 요청 결과를 공유합니다.

use std::{
    collections::HashMap,
    sync::RwLock,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use futures_util::lock::Mutex;
use jsonwebtoken::DecodingKey;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::services::auth::oauth_verifier::{KeyError, KeyProvider};

/// JWKS 재요청 최소 간격
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct Jwk {
    kty: String,
    kid: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
    last_attempt: Option<Instant>,
}

/// 캐시 조회 결과
struct Lookup {
    key: Option<DecodingKey>,
    needs_refresh: bool,
    loaded: bool,
}

impl Lookup {
    /// 갱신 없이 현재 캐시로 응답
    fn settle(self) -> Result<DecodingKey, KeyError> {
        match self.key {
            Some(key) => Ok(key),
            None if self.loaded => Err(KeyError::UnknownKey),
            None => Err(KeyError::Unavailable("JWKS를 아직 받아오지 못했습니다".to_string())),
        }
    }
}

pub struct JwksCache {
    client: reqwest::Client,
    uri: String,
    ttl: Duration,
    min_refetch_interval: Duration,
    state: RwLock<CachedKeys>,
    fetch_gate: Mutex<()>,
}

impl JwksCache {
    /// 키는 첫 검증 요청 때 받아옵니다.
    pub fn new(uri: impl Into<String>, ttl: Duration, request_timeout: Duration) -> Result<Self, KeyError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| KeyError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            uri: uri.into(),
            ttl,
            min_refetch_interval: MIN_REFETCH_INTERVAL,
            state: RwLock::new(CachedKeys {
                keys: HashMap::new(),
                fetched_at: None,
                last_attempt: None,
            }),
            fetch_gate: Mutex::new(()),
        })
    }

    pub fn with_min_refetch_interval(mut self, interval: Duration) -> Self {
        self.min_refetch_interval = interval;
        self
    }

    async fn fetch(&self) -> Result<(), KeyError> {
        debug!("JWKS 요청: {}", self.uri);

        let response = self
            .client
            .get(&self.uri)
            .send()
            .await
            .map_err(|e| KeyError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(KeyError::Unavailable(format!(
                "JWKS 응답 상태 {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| KeyError::Unavailable(e.to_string()))?;
        let keys = parse_jwks(&body)?;

        info!("JWKS 갱신 완료: {} ({}개 키)", self.uri, keys.len());

        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.keys = keys;
        state.fetched_at = Some(Instant::now());
        Ok(())
    }

    fn lookup(&self, kid: &str) -> Result<Lookup, KeyError> {
        let state = self.state.read().map_err(|_| poisoned())?;

        let key = state.keys.get(kid).cloned();
        let stale = state.fetched_at.is_none_or(|at| at.elapsed() > self.ttl);
        let throttled = state
            .last_attempt
            .is_some_and(|at| at.elapsed() < self.min_refetch_interval);

        Ok(Lookup {
            needs_refresh: (stale || key.is_none()) && !throttled,
            loaded: state.fetched_at.is_some(),
            key,
        })
    }

    fn record_attempt(&self) -> Result<(), KeyError> {
        self.state.write().map_err(|_| poisoned())?.last_attempt = Some(Instant::now());
        Ok(())
    }
}

fn poisoned() -> KeyError {
    KeyError::Unavailable("JWKS 캐시 락이 손상되었습니다".to_string())
}

#[async_trait]
impl KeyProvider for JwksCache {
    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, KeyError> {
        let kid = kid.ok_or(KeyError::UnknownKey)?;

        let lookup = self.lookup(kid)?;
        if !lookup.needs_refresh && lookup.key.is_some() {
            return lookup.settle();
        }

        // 대기하는 동안 앞선 요청이 갱신을 시도했으면 그 결과를 따름
        let _gate = self.fetch_gate.lock().await;
        let lookup = self.lookup(kid)?;
        if !lookup.needs_refresh {
            return lookup.settle();
        }

        self.record_attempt()?;
        if let Err(e) = self.fetch().await {
            // 이전 키가 남아 있으면 그대로 사용
            if let Some(key) = lookup.key {
                warn!("JWKS 갱신 실패, 캐시된 키 사용: {}", e);
                return Ok(key);
            }
            return Err(e);
        }

        self.lookup(kid)?.key.ok_or(KeyError::UnknownKey)
    }
}

/// JWKS 문서에서 `kid`가 있는 RSA 키만 추립니다.
fn parse_jwks(body: &str) -> Result<HashMap<String, DecodingKey>, KeyError> {
    let set: JwkSet = serde_json::from_str(body)
        .map_err(|e| KeyError::Unavailable(format!("JWKS 파싱 실패: {}", e)))?;

    let mut keys = HashMap::new();
    for jwk in set.keys {
        let (Some(kid), Some(n), Some(e)) = (jwk.kid, jwk.n, jwk.e) else {
            continue;
        };
        if jwk.kty != "RSA" {
            continue;
        }

        match DecodingKey::from_rsa_components(&n, &e) {
            Ok(key) => {
                keys.insert(kid, key);
            }
            Err(err) => warn!("JWKS 키 무시 ({}): {}", kid, err),
        }
    }

    Ok(keys)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 로컬 JWKS 엔드포인트

    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer};
    use serde_json::json;

    use crate::services::auth::oauth_verifier::test_support::{TEST_RSA_E, TEST_RSA_N};

    /// 요청 횟수를 세는 로컬 JWKS 서버
    pub struct JwksEndpoint {
        pub uri: String,
        hits: Arc<AtomicUsize>,
        response: Arc<Mutex<(u16, String)>>,
    }

    impl JwksEndpoint {
        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        pub fn respond(&self, status: u16, body: String) {
            *self.response.lock().unwrap() = (status, body);
        }
    }

    /// 테스트 RSA 키를 주어진 `kid`들로 게시하는 JWKS 문서
    pub fn jwks_document(kids: &[&str]) -> String {
        let keys: Vec<_> = kids
            .iter()
            .map(|kid| json!({ "kty": "RSA", "kid": kid, "alg": "RS256", "use": "sig", "n": TEST_RSA_N, "e": TEST_RSA_E }))
            .collect();
        json!({ "keys": keys }).to_string()
    }

    pub async fn serve(status: u16, body: String) -> JwksEndpoint {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = Arc::new(Mutex::new((status, body)));

        let (server_hits, server_response) = (hits.clone(), response.clone());
        let server = HttpServer::new(move || {
            let hits = server_hits.clone();
            let response = server_response.clone();
            App::new().route(
                "/keys",
                web::get().to(move || {
                    let hits = hits.clone();
                    let response = response.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        let (status, body) = response.lock().unwrap().clone();
                        HttpResponse::build(StatusCode::from_u16(status).unwrap())
                            .content_type("application/json")
                            .body(body)
                    }
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        JwksEndpoint {
            uri: format!("http://{}/keys", addr),
            hits,
            response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use futures_util::future::join_all;

    const SAMPLE_JWKS: &str = r#"{
        "keys": [
            { "kty": "RSA", "kid": "key-1", "use": "sig", "alg": "RS256", "n": "sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1WlUzewbgBHod5pcM9H95GQRV3JDXboIRROSBigeC5yjU1hGzHHyXss8UDprecbAYxknTcQkhslANGRUZmdTOQ5qTRsLAt6BTYuyvVRdhS8exSZEy_c4gs_7svlJJQ4H9_NxsiIoLwAEk7-Q3UXERGYw_75IDrGA84-lA_-Ct4eTlXHBIY2EaV7t7LjJaynVJCpkv4LKjTTAumiGUIuQhrNhZLuF_RJLqHpM2kgWFLU7-VTdL1VbC2tejvcI2BlMkEpk1BzBZI0KQB0GaDWFLN-aEAw3vRw", "e": "AQAB" },
            { "kty": "EC", "kid": "key-2", "crv": "P-256", "x": "abc", "y": "def" },
            { "kty": "RSA", "n": "sXch", "e": "AQAB" }
        ]
    }"#;

    fn cache(uri: &str) -> JwksCache {
        JwksCache::new(uri, Duration::from_secs(60), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_parse_keeps_rsa_keys_with_kid() {
        let keys = parse_jwks(SAMPLE_JWKS).unwrap();

        assert_eq!(keys.len(), 1);
        assert!(keys.contains_key("key-1"));
    }

    #[test]
    fn test_parse_rejects_invalid_document() {
        assert!(matches!(parse_jwks("not json"), Err(KeyError::Unavailable(_))));
    }

    #[actix_web::test]
    async fn test_missing_kid_is_unknown_key() {
        let cache = cache("http://127.0.0.1:9/keys");

        assert_eq!(cache.decoding_key(None).await.err(), Some(KeyError::UnknownKey));
    }

    #[actix_web::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let cache = cache("http://127.0.0.1:9/keys");

        let result = cache.decoding_key(Some("key-1")).await;
        assert!(matches!(result, Err(KeyError::Unavailable(_))));
    }

    #[actix_web::test]
    async fn test_keys_are_cached_within_ttl() {
        let endpoint = serve(200, jwks_document(&["key-1"])).await;
        let cache = cache(&endpoint.uri);

        for _ in 0..5 {
            assert!(cache.decoding_key(Some("key-1")).await.is_ok());
        }
        assert_eq!(endpoint.hits(), 1);
    }

    #[actix_web::test]
    async fn test_unknown_kid_triggers_refetch() {
        let endpoint = serve(200, jwks_document(&["key-1"])).await;
        let cache = cache(&endpoint.uri).with_min_refetch_interval(Duration::ZERO);

        assert!(cache.decoding_key(Some("key-1")).await.is_ok());
        assert_eq!(
            cache.decoding_key(Some("rotated")).await.err(),
            Some(KeyError::UnknownKey)
        );
        assert_eq!(endpoint.hits(), 2);

        endpoint.respond(200, jwks_document(&["key-1", "rotated"]));
        assert!(cache.decoding_key(Some("rotated")).await.is_ok());
        assert_eq!(endpoint.hits(), 3);
    }

    #[actix_web::test]
    async fn test_unknown_kid_refetch_is_throttled() {
        let endpoint = serve(200, jwks_document(&["key-1"])).await;
        let cache = cache(&endpoint.uri);

        assert!(cache.decoding_key(Some("key-1")).await.is_ok());
        for _ in 0..5 {
            assert_eq!(
                cache.decoding_key(Some("forged")).await.err(),
                Some(KeyError::UnknownKey)
            );
        }
        assert_eq!(endpoint.hits(), 1);
    }

    #[actix_web::test]
    async fn test_failed_fetch_is_throttled() {
        let endpoint = serve(503, "unavailable".to_string()).await;
        let cache = cache(&endpoint.uri);

        for _ in 0..20 {
            assert!(matches!(
                cache.decoding_key(Some("key-1")).await,
                Err(KeyError::Unavailable(_))
            ));
        }
        assert_eq!(endpoint.hits(), 1);
    }

    #[actix_web::test]
    async fn test_concurrent_lookups_share_one_fetch() {
        let endpoint = serve(200, jwks_document(&["key-1"])).await;
        let cache = cache(&endpoint.uri);

        let results = join_all((0..10).map(|_| cache.decoding_key(Some("key-1")))).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(endpoint.hits(), 1);
    }

    #[actix_web::test]
    async fn test_stale_key_survives_failed_refresh() {
        let endpoint = serve(200, jwks_document(&["key-1"])).await;
        let cache = JwksCache::new(&endpoint.uri, Duration::ZERO, Duration::from_secs(2))
            .unwrap()
            .with_min_refetch_interval(Duration::ZERO);

        assert!(cache.decoding_key(Some("key-1")).await.is_ok());

        endpoint.respond(503, "down".to_string());
        assert!(cache.decoding_key(Some("key-1")).await.is_ok());
        assert_eq!(endpoint.hits(), 2);
    }
}
