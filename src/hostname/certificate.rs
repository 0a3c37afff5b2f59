// This file is part of the terraform-provider-bunny project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Free certificate provisioning
//!
//! The certificate authority only issues the certificate once the CNAME record of the
//! hostname points to bunny.net. Until then the API rejects the request, and the call is
//! retried.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

/// Minimum delay between two attempts
pub const MIN_DELAY: Duration = Duration::from_secs(5);

/// Default Terraform create timeout
pub const LOAD_TIMEOUT: Duration = Duration::from_secs(20 * 60);

const DNS_NOT_READY: &str = "is not pointing to our servers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateState {
    WaitingForDnsRecord,
    CertificateLoaded,
}

#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("timeout while waiting for the dns record of {hostname:?} ({attempts} attempts)")]
    Timeout { hostname: String, attempts: u32 },
    #[error(transparent)]
    Api(#[from] bunny_client::Error),
}

fn classify(result: bunny_client::Result<()>) -> Result<CertificateState, bunny_client::Error> {
    match result {
        Ok(()) => Ok(CertificateState::CertificateLoaded),
        Err(err) => match err.as_api_error() {
            Some(api) if api.message.to_lowercase().contains(DNS_NOT_READY) => {
                Ok(CertificateState::WaitingForDnsRecord)
            }
            _ => Err(err),
        },
    }
}

/// Call `attempt` until the certificate is loaded
///
/// Returns the number of attempts. Any error other than the missing DNS record is
/// returned at once. `timeout` also bounds a pending attempt.
pub async fn load_free_certificate_with_retry<F, Fut>(
    hostname: &str,
    timeout: Duration,
    mut attempt: F,
) -> Result<u32, CertificateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bunny_client::Result<()>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let Ok(result) = tokio::time::timeout_at(deadline, attempt()).await else {
            return Err(CertificateError::Timeout {
                hostname: hostname.to_owned(),
                attempts,
            });
        };
        match classify(result)? {
            CertificateState::CertificateLoaded => {
                debug!(hostname, attempts, "free certificate loaded");
                return Ok(attempts);
            }
            CertificateState::WaitingForDnsRecord => {
                info!(hostname, attempts, "cname dns record missing");
                let next = Instant::now() + MIN_DELAY;
                if next > deadline {
                    return Err(CertificateError::Timeout {
                        hostname: hostname.to_owned(),
                        attempts,
                    });
                }
                tokio::time::sleep_until(next).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn api_error(message: &str) -> bunny_client::Error {
        let body = format!(r#"{{"ErrorKey": "pullzone.hostname", "Message": "{message}"}}"#);
        bunny_client::classify_response(
            400,
            "https://api.bunny.net/pullzone/loadFreeCertificate",
            body.as_bytes(),
        )
    }

    fn dns_not_ready() -> bunny_client::Error {
        api_error("The hostname cdn.example.com Is Not Pointing To Our Servers.")
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_the_record_exists() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let attempts = load_free_certificate_with_retry("cdn.example.com", LOAD_TIMEOUT, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Err(dns_not_ready())
                } else {
                    Ok(())
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(attempts, 4);
        assert_eq!(start.elapsed(), MIN_DELAY * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_at_the_deadline() {
        let result = load_free_certificate_with_retry(
            "cdn.example.com",
            Duration::from_secs(12),
            || async { Err(dns_not_ready()) },
        )
        .await;
        assert!(matches!(
            result,
            Err(CertificateError::Timeout { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn pending_attempt_stops_at_the_deadline() {
        let start = Instant::now();
        let result = load_free_certificate_with_retry(
            "cdn.example.com",
            Duration::from_secs(12),
            || std::future::pending::<bunny_client::Result<()>>(),
        )
        .await;
        assert!(matches!(
            result,
            Err(CertificateError::Timeout { attempts: 1, .. })
        ));
        assert_eq!(start.elapsed(), Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result = load_free_certificate_with_retry("cdn.example.com", LOAD_TIMEOUT, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(api_error("The hostname does not exist")) }
        })
        .await;
        assert!(matches!(result, Err(CertificateError::Api(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn states() {
        assert_eq!(classify(Ok(())).unwrap(), CertificateState::CertificateLoaded);
        assert_eq!(
            classify(Err(dns_not_ready())).unwrap(),
            CertificateState::WaitingForDnsRecord
        );
    }
}
