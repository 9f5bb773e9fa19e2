//! HTTP-backed state storage.
//!
//! The document lives at a single URL:
//!
//! | Operation | Request                      | Success          | Other                              |
//! |-----------|------------------------------|------------------|------------------------------------|
//! | get       | `GET address`                | 200 (body)       | 204/404 or empty body → no state   |
//! | put       | `POST address`               | any 2xx          |                                    |
//! | lock      | `LOCK lock_address` + info   | 200              | 409/423 → held (body is holder)    |
//! | unlock    | `UNLOCK unlock_address`      | 200/204          | 404 → not held, 409/423 → held     |
//!
//! Locking is only available when a lock address is configured.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ClientError, LockError, LockInfo, Payload, StateClient, StateLocker};

/// Connection settings for [`HttpClient`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
  /// URL of the state document.
  pub address: String,

  /// URL receiving `LOCK` requests. Locking is disabled when unset.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lock_address: Option<String>,

  /// URL receiving `UNLOCK` requests. Defaults to `lock_address`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unlock_address: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,

  /// Per-request timeout in seconds.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timeout_secs: Option<u64>,
}

impl fmt::Debug for HttpClientConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HttpClientConfig")
      .field("address", &self.address)
      .field("lock_address", &self.lock_address)
      .field("unlock_address", &self.unlock_address)
      .field("username", &self.username)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("timeout_secs", &self.timeout_secs)
      .finish()
  }
}

/// Stores state behind an HTTP endpoint.
#[derive(Debug)]
pub struct HttpClient {
  config: HttpClientConfig,
  http: Client,
  held: Mutex<Option<LockInfo>>,
}

impl HttpClient {
  pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let http = builder.build().map_err(|source| ClientError::Request {
      url: config.address.clone(),
      source,
    })?;

    Ok(Self {
      config,
      http,
      held: Mutex::new(None),
    })
  }

  pub fn address(&self) -> &str {
    &self.config.address
  }

  /// Returns true if a lock address is configured.
  pub fn supports_locking(&self) -> bool {
    self.config.lock_address.is_some()
  }

  fn request(&self, method: Method, url: &str) -> RequestBuilder {
    let builder = self.http.request(method, url);
    match &self.config.username {
      Some(username) => builder.basic_auth(username, self.config.password.as_deref()),
      None => builder,
    }
  }

  fn lock_url(&self) -> Result<&str, LockError> {
    self
      .config
      .lock_address
      .as_deref()
      .ok_or_else(|| LockError::Unavailable("no lock address configured".to_string()))
  }

  fn unlock_url(&self) -> Result<&str, LockError> {
    match self.config.unlock_address.as_deref() {
      Some(url) => Ok(url),
      None => self.lock_url(),
    }
  }

  fn held(&self) -> MutexGuard<'_, Option<LockInfo>> {
    self.held.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn held_error(url: &str, response: Response) -> LockError {
    match response.json::<LockInfo>() {
      Ok(info) => LockError::Held(Box::new(info)),
      Err(_) => LockError::HeldUnknown { location: url.to_string() },
    }
  }
}

fn custom_method(name: &'static str) -> Method {
  Method::from_bytes(name.as_bytes()).unwrap_or(Method::POST)
}

fn response_body(response: Response) -> String {
  response.text().unwrap_or_default()
}

impl StateClient for HttpClient {
  fn get(&self) -> Result<Option<Payload>, ClientError> {
    let url = self.config.address.as_str();
    let response = self
      .request(Method::GET, url)
      .send()
      .map_err(|source| ClientError::Request {
        url: url.to_string(),
        source,
      })?;

    let status = response.status();
    debug!(%url, status = status.as_u16(), "fetched remote state");

    match status {
      StatusCode::OK => {
        let data = response.bytes().map_err(|source| ClientError::Request {
          url: url.to_string(),
          source,
        })?;
        if data.is_empty() {
          return Ok(None);
        }
        Ok(Some(Payload::new(data.to_vec())))
      }
      StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(None),
      other => Err(ClientError::Status {
        method: "GET".to_string(),
        url: url.to_string(),
        status: other.as_u16(),
        body: response_body(response),
      }),
    }
  }

  fn put(&self, data: &[u8]) -> Result<(), ClientError> {
    let url = self.config.address.as_str();
    let response = self
      .request(Method::POST, url)
      .header(reqwest::header::CONTENT_TYPE, "application/json")
      .body(data.to_vec())
      .send()
      .map_err(|source| ClientError::Request {
        url: url.to_string(),
        source,
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(ClientError::Status {
        method: "POST".to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body: response_body(response),
      });
    }

    debug!(%url, bytes = data.len(), "stored remote state");
    Ok(())
  }
}

impl StateLocker for HttpClient {
  fn lock(&self, reason: &str) -> Result<(), LockError> {
    let url = self.lock_url()?;
    let info = LockInfo::new(reason, self.config.address.clone());

    let response = self
      .request(custom_method("LOCK"), url)
      .json(&info)
      .send()
      .map_err(|source| LockError::Request {
        url: url.to_string(),
        source,
      })?;

    match response.status() {
      StatusCode::OK => {
        info!(%url, id = %info.id, "acquired state lock");
        *self.held() = Some(info);
        Ok(())
      }
      StatusCode::CONFLICT | StatusCode::LOCKED => Err(Self::held_error(url, response)),
      other => Err(LockError::Status {
        method: "LOCK".to_string(),
        url: url.to_string(),
        status: other.as_u16(),
        body: response_body(response),
      }),
    }
  }

  fn unlock(&self) -> Result<(), LockError> {
    let url = self.unlock_url()?;
    let held = self.held().clone();

    let mut request = self.request(custom_method("UNLOCK"), url);
    if let Some(info) = &held {
      request = request.json(info);
    }
    let response = request.send().map_err(|source| LockError::Request {
      url: url.to_string(),
      source,
    })?;

    match response.status() {
      StatusCode::OK | StatusCode::NO_CONTENT => {
        info!(%url, "released state lock");
        *self.held() = None;
        Ok(())
      }
      StatusCode::NOT_FOUND => Err(LockError::NotHeld { location: url.to_string() }),
      StatusCode::CONFLICT | StatusCode::LOCKED => Err(Self::held_error(url, response)),
      other => Err(LockError::Status {
        method: "UNLOCK".to_string(),
        url: url.to_string(),
        status: other.as_u16(),
        body: response_body(response),
      }),
    }
  }
}
