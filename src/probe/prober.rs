//! Bounded-concurrency resolution of a batch of domains.

use super::{
    options::ProbeOptions,
    result::{ErrorKind, ResolutionResult},
    validate::validate_host,
};
use crate::base::neterror::NetError;
use crate::dns::{Name, Resolve};
use futures::{
    stream::{self, AbortHandle, Abortable, BoxStream},
    Stream, StreamExt,
};
use std::{
    fmt,
    net::IpAddr,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

/// Resolves batches of domains against a [`Resolve`] implementation.
///
/// A `Prober` is cheap to share; every call to [`Prober::probe`] is an
/// independent run with no state carried over from earlier runs.
///
/// # Example
///
/// ```rust,ignore
/// use futures::StreamExt;
/// use resolvenet::dns::GaiResolver;
/// use resolvenet::probe::{Prober, ProbeOptions};
/// use std::sync::Arc;
///
/// let prober = Prober::with_options(Arc::new(GaiResolver::new()), ProbeOptions::default());
/// let mut results = prober.probe(["example.com", "nope.invalid"])?;
/// while let Some(result) = results.next().await {
///     println!("{result}");
/// }
/// ```
#[derive(Clone)]
pub struct Prober {
    resolver: Arc<dyn Resolve>,
    options: ProbeOptions,
}

impl Prober {
    /// Creates a prober with default options.
    pub fn new(resolver: Arc<dyn Resolve>) -> Self {
        Self::with_options(resolver, ProbeOptions::default())
    }

    pub fn with_options(resolver: Arc<dyn Resolve>, options: ProbeOptions) -> Self {
        Self { resolver, options }
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Starts a probe over `domains`.
    ///
    /// Nothing is resolved until the returned stream is polled. Exactly one
    /// result is produced per input entry; duplicates are resolved
    /// independently.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::InvalidArgument`] if the options are unusable
    /// (a concurrency of zero). Per-domain failures never surface here.
    pub fn probe<I, S>(&self, domains: I) -> Result<Probe, NetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let concurrency = self.options.concurrency;
        if concurrency == 0 {
            tracing::warn!("refusing to probe with a concurrency of zero");
            return Err(NetError::InvalidArgument);
        }

        let domains: Vec<String> = domains.into_iter().map(Into::into).collect();
        tracing::debug!(
            count = domains.len(),
            concurrency,
            ordered = self.options.ordered_output,
            timeout = ?self.options.timeout,
            "starting probe"
        );

        let resolver = Arc::clone(&self.resolver);
        let options = Arc::new(self.options.clone());
        let ordered = options.ordered_output;

        let attempts = stream::iter(domains.into_iter().enumerate()).map(move |(index, domain)| {
            probe_one(Arc::clone(&resolver), Arc::clone(&options), index, domain)
        });

        let results = if ordered {
            attempts.buffered(concurrency).boxed()
        } else {
            attempts.buffer_unordered(concurrency).boxed()
        };

        Ok(Probe::new(results))
    }

    /// Runs a probe to completion and collects every result.
    pub async fn probe_all<I, S>(&self, domains: I) -> Result<Vec<ResolutionResult>, NetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.probe(domains)?.collect().await)
    }
}

impl fmt::Debug for Prober {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prober")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

async fn probe_one(
    resolver: Arc<dyn Resolve>,
    options: Arc<ProbeOptions>,
    index: usize,
    domain: String,
) -> ResolutionResult {
    if options.validate_names {
        if let Err(reason) = validate_host(&domain) {
            tracing::debug!(domain = %domain, reason, "rejecting malformed name");
            return ResolutionResult::failed(domain, index, ErrorKind::InvalidInput, reason, 0);
        }
    }

    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match lookup(resolver.as_ref(), &domain, &options).await {
            Ok(address) => {
                tracing::debug!(domain = %domain, %address, attempts, "resolved");
                return ResolutionResult::resolved(domain, index, address, attempts);
            }
            Err(err) if attempts <= options.max_retries => {
                tracing::debug!(domain = %domain, error = %err, attempts, "lookup failed, retrying");
            }
            Err(err) => {
                let kind = ErrorKind::classify(&err);
                if kind == ErrorKind::Timeout {
                    tracing::warn!(domain = %domain, timeout = ?options.timeout, attempts, "lookup timed out");
                } else {
                    tracing::debug!(domain = %domain, error = %err, code = err.as_i32(), attempts, "does not resolve");
                }
                return ResolutionResult::failed(domain, index, kind, err.to_string(), attempts);
            }
        }
    }
}

/// One lookup, bounded by the configured timeout. Dropping the resolver
/// future on timeout abandons that lookup only.
async fn lookup(
    resolver: &dyn Resolve,
    domain: &str,
    options: &ProbeOptions,
) -> Result<IpAddr, NetError> {
    let resolving = resolver.resolve(Name::new(domain));
    let addrs = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, resolving)
            .await
            .map_err(|_| NetError::TimedOut)??,
        None => resolving.await?,
    };

    options
        .address_selection
        .select(addrs.map(|addr| addr.ip()))
        .ok_or(NetError::NameNotResolved)
}

/// Cancels a running [`Probe`] from anywhere.
#[derive(Debug, Clone)]
pub struct ProbeHandle {
    abort: AbortHandle,
}

impl ProbeHandle {
    /// Stops the probe. In-flight lookups are abandoned, no new ones start
    /// and the stream ends at its next poll. Results already taken from the
    /// stream stay valid.
    pub fn cancel(&self) {
        if !self.abort.is_aborted() {
            tracing::debug!("probe cancelled");
        }
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// Lazy stream of [`ResolutionResult`]s produced by [`Prober::probe`].
pub struct Probe {
    results: Abortable<BoxStream<'static, ResolutionResult>>,
    handle: ProbeHandle,
}

impl Probe {
    fn new(results: BoxStream<'static, ResolutionResult>) -> Self {
        let (results, abort) = stream::abortable(results);
        Self {
            results,
            handle: ProbeHandle { abort },
        }
    }

    /// Returns a handle that can cancel this probe.
    pub fn handle(&self) -> ProbeHandle {
        self.handle.clone()
    }

    /// Shortcut for `self.handle().cancel()`.
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }
}

impl Stream for Probe {
    type Item = ResolutionResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.results.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_cancelled() {
            (0, Some(0))
        } else {
            self.results.size_hint()
        }
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
