//! Prober Tests
//!
//! Covers:
//! - One result per input, including duplicates and empty input
//! - Input-order vs completion-order delivery
//! - Per-query timeouts that leave sibling lookups alone
//! - Concurrency bound
//! - Cancellation mid-probe

use futures::StreamExt;
use resolvenet::base::neterror::NetError;
use resolvenet::dns::{Addrs, Name, Resolve, Resolving};
use resolvenet::probe::{ErrorKind, ProbeOptions, Prober, ResolutionStatus};

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
enum Answer {
    Addrs(Vec<IpAddr>),
    NoSuchName,
    Hang,
}

#[derive(Default)]
struct Stats {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

/// Scripted resolver: per-name answer and delay, unknown names fail.
#[derive(Clone, Default)]
struct MockResolver {
    answers: HashMap<String, (Answer, Duration)>,
    stats: Arc<Stats>,
}

impl MockResolver {
    fn answer(self, name: &str, ip: [u8; 4]) -> Self {
        self.answer_after(name, ip, Duration::ZERO)
    }

    fn answer_after(mut self, name: &str, ip: [u8; 4], delay: Duration) -> Self {
        let ip = IpAddr::V4(Ipv4Addr::from(ip));
        self.answers
            .insert(name.to_string(), (Answer::Addrs(vec![ip]), delay));
        self
    }

    fn answer_all(mut self, name: &str, ips: Vec<IpAddr>) -> Self {
        self.answers
            .insert(name.to_string(), (Answer::Addrs(ips), Duration::ZERO));
        self
    }

    fn hang(mut self, name: &str) -> Self {
        self.answers
            .insert(name.to_string(), (Answer::Hang, Duration::ZERO));
        self
    }

    fn calls(&self) -> usize {
        self.stats.calls.load(Ordering::SeqCst)
    }

    fn in_flight(&self) -> usize {
        self.stats.in_flight.load(Ordering::SeqCst)
    }

    fn peak_in_flight(&self) -> usize {
        self.stats.peak_in_flight.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<String> {
        self.stats.seen.lock().unwrap().clone()
    }
}

struct InFlight(Arc<Stats>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Resolve for MockResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let stats = Arc::clone(&self.stats);
        stats.calls.fetch_add(1, Ordering::SeqCst);
        stats.seen.lock().unwrap().push(name.to_string());

        let (answer, delay) = self
            .answers
            .get(name.as_str())
            .cloned()
            .unwrap_or((Answer::NoSuchName, Duration::ZERO));

        Box::pin(async move {
            let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            stats.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            let _guard = InFlight(stats);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match answer {
                Answer::Addrs(ips) => {
                    let addrs: Vec<SocketAddr> =
                        ips.into_iter().map(|ip| SocketAddr::new(ip, 0)).collect();
                    Ok(Box::new(addrs.into_iter()) as Addrs)
                }
                Answer::NoSuchName => Err(NetError::dns_failed(
                    name.as_str(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no such host"),
                )),
                Answer::Hang => std::future::pending().await,
            }
        })
    }
}

fn prober(mock: &MockResolver, options: ProbeOptions) -> Prober {
    Prober::with_options(Arc::new(mock.clone()), options)
}

#[tokio::test]
async fn test_resolves_known_address() {
    let mock = MockResolver::default().answer("example.com", [93, 184, 216, 34]);

    let results = prober(&mock, ProbeOptions::default())
        .probe_all(["example.com"])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].domain, "example.com");
    assert_eq!(results[0].status(), ResolutionStatus::Resolved);
    assert_eq!(
        results[0].address(),
        Some(IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)))
    );
    assert_eq!(results[0].error_kind(), None);
}

#[tokio::test]
async fn test_nonexistent_domain_fails() {
    let mock = MockResolver::default();
    let domain = "this-domain-does-not-exist-xyz123.invalid";

    let results = prober(&mock, ProbeOptions::default())
        .probe_all([domain])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].domain, domain);
    assert_eq!(results[0].status(), ResolutionStatus::Failed);
    assert_eq!(
        results[0].error_kind(),
        Some(ErrorKind::NameResolutionFailure)
    );
    assert_eq!(results[0].address(), None);
    assert_eq!(results[0].to_string(), format!("{domain} does not resolve"));
}

#[tokio::test]
async fn test_empty_input_makes_no_lookups() {
    let mock = MockResolver::default();

    let results = prober(&mock, ProbeOptions::default())
        .probe_all(Vec::<String>::new())
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_one_result_per_input_with_duplicates() {
    let mock = MockResolver::default()
        .answer("a.example", [10, 0, 0, 1])
        .answer("b.example", [10, 0, 0, 2]);
    let input = ["a.example", "missing.example", "a.example", "b.example", "a.example"];

    let results = prober(&mock, ProbeOptions::default().concurrency(3))
        .probe_all(input)
        .await
        .unwrap();

    assert_eq!(results.len(), input.len());
    // Duplicates are looked up independently
    assert_eq!(mock.calls(), input.len());

    let dupes: Vec<_> = results.iter().filter(|r| r.domain == "a.example").collect();
    assert_eq!(dupes.len(), 3);
    assert!(dupes
        .iter()
        .all(|r| r.address() == Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))));

    let indices: Vec<_> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_ordered_output_waits_for_earlier_entries() {
    let mock = MockResolver::default()
        .answer_after("slow.example", [10, 0, 0, 1], Duration::from_secs(3))
        .answer_after("medium.example", [10, 0, 0, 2], Duration::from_secs(2))
        .answer("fast.example", [10, 0, 0, 3]);

    let results = prober(&mock, ProbeOptions::default().ordered_output(true))
        .probe_all(["slow.example", "medium.example", "fast.example"])
        .await
        .unwrap();

    let domains: Vec<_> = results.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, vec!["slow.example", "medium.example", "fast.example"]);
    assert!(results.iter().all(|r| r.is_resolved()));
}

#[tokio::test(start_paused = true)]
async fn test_unordered_output_follows_completion() {
    let mock = MockResolver::default()
        .answer_after("slow.example", [10, 0, 0, 1], Duration::from_secs(3))
        .answer_after("medium.example", [10, 0, 0, 2], Duration::from_secs(2))
        .answer("fast.example", [10, 0, 0, 3]);

    let results = prober(&mock, ProbeOptions::default().ordered_output(false))
        .probe_all(["slow.example", "medium.example", "fast.example"])
        .await
        .unwrap();

    let domains: Vec<_> = results.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, vec!["fast.example", "medium.example", "slow.example"]);
    let indices: Vec<_> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![2, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_does_not_affect_siblings() {
    let mock = MockResolver::default()
        .answer_after("slow.example", [10, 0, 0, 1], Duration::from_secs(10))
        .answer("fast.example", [10, 0, 0, 2]);
    let options = ProbeOptions::default().timeout(Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    let results = prober(&mock, options)
        .probe_all(["slow.example", "fast.example"])
        .await
        .unwrap();

    assert_eq!(results[0].domain, "slow.example");
    assert_eq!(results[0].status(), ResolutionStatus::Failed);
    assert_eq!(results[0].error_kind(), Some(ErrorKind::Timeout));

    assert_eq!(results[1].domain, "fast.example");
    assert_eq!(
        results[1].address(),
        Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)))
    );

    // The slow lookup was abandoned at the timeout, not awaited
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(mock.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_lookup_is_retried() {
    let mock = MockResolver::default().hang("stuck.example");
    let options = ProbeOptions::default()
        .timeout(Duration::from_millis(500))
        .max_retries(2);

    let results = prober(&mock, options)
        .probe_all(["stuck.example"])
        .await
        .unwrap();

    assert_eq!(results[0].error_kind(), Some(ErrorKind::Timeout));
    assert_eq!(results[0].attempts, 3);
    assert_eq!(mock.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_bound_is_respected() {
    let mut mock = MockResolver::default();
    let names: Vec<String> = (0..20).map(|i| format!("host{i}.example")).collect();
    for name in &names {
        mock = mock.answer_after(name, [10, 0, 0, 1], Duration::from_millis(100));
    }

    let results = prober(&mock, ProbeOptions::default().concurrency(4))
        .probe_all(names.clone())
        .await
        .unwrap();

    assert_eq!(results.len(), 20);
    assert_eq!(mock.peak_in_flight(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_sequential_resolves_in_input_order() {
    let mock = MockResolver::default()
        .answer_after("one.example", [10, 0, 0, 1], Duration::from_secs(1))
        .answer("two.example", [10, 0, 0, 2])
        .answer("three.example", [10, 0, 0, 3]);

    let results = prober(&mock, ProbeOptions::sequential())
        .probe_all(["one.example", "two.example", "three.example"])
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(mock.peak_in_flight(), 1);
    assert_eq!(
        mock.seen(),
        vec!["one.example", "two.example", "three.example"]
    );
}

#[tokio::test]
async fn test_sequential_reports_ipv4_only() {
    let v4 = IpAddr::V4(Ipv4Addr::LOCALHOST);
    let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
    let mock = MockResolver::default()
        .answer_all("localhost", vec![v6, v4])
        .answer_all("v6only.example", vec![v6]);

    let results = prober(&mock, ProbeOptions::sequential())
        .probe_all(["localhost", "v6only.example"])
        .await
        .unwrap();

    assert_eq!(results[0].to_string(), "localhost resolves to 127.0.0.1");
    assert_eq!(results[1].to_string(), "v6only.example does not resolve");
    assert_eq!(
        results[1].error_kind(),
        Some(ErrorKind::NameResolutionFailure)
    );

    // The default policy keeps the resolver's first answer
    let results = prober(&mock, ProbeOptions::default())
        .probe_all(["localhost"])
        .await
        .unwrap();
    assert_eq!(results[0].address(), Some(v6));
}

#[tokio::test]
async fn test_cancel_after_two_results() {
    let mock = MockResolver::default()
        .answer("a.example", [10, 0, 0, 1])
        .answer("b.example", [10, 0, 0, 2])
        .hang("c.example")
        .hang("d.example")
        .hang("e.example");
    let options = ProbeOptions::default()
        .concurrency(5)
        .ordered_output(false)
        .no_timeout();

    let mut probe = prober(&mock, options)
        .probe(["a.example", "b.example", "c.example", "d.example", "e.example"])
        .unwrap();
    let handle = probe.handle();

    let mut seen = Vec::new();
    while let Some(result) = probe.next().await {
        seen.push(result);
        if seen.len() == 2 {
            handle.cancel();
        }
    }

    assert!(probe.is_cancelled());
    assert_eq!(seen.len(), 2);
    let mut domains: Vec<_> = seen.iter().map(|r| r.domain.as_str()).collect();
    domains.sort();
    assert_eq!(domains, vec!["a.example", "b.example"]);

    let calls_at_cancel = mock.calls();
    assert!(probe.next().await.is_none());
    tokio::task::yield_now().await;
    assert_eq!(mock.calls(), calls_at_cancel);
}

#[tokio::test]
async fn test_cancel_stops_new_lookups() {
    let mock = MockResolver::default()
        .answer("a.example", [10, 0, 0, 1])
        .answer("b.example", [10, 0, 0, 2])
        .answer("c.example", [10, 0, 0, 3])
        .answer("d.example", [10, 0, 0, 4]);
    let options = ProbeOptions::default().concurrency(1);

    let mut probe = prober(&mock, options)
        .probe(["a.example", "b.example", "c.example", "d.example"])
        .unwrap();

    let first = probe.next().await.unwrap();
    assert_eq!(first.domain, "a.example");
    probe.cancel();

    assert!(probe.next().await.is_none());
    // Only the lookup that produced the emitted result ever ran
    assert_eq!(mock.calls(), 1);
    assert_eq!(first.address(), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
}

#[tokio::test]
async fn test_zero_concurrency_is_rejected_before_lookups() {
    let mock = MockResolver::default().answer("a.example", [10, 0, 0, 1]);

    let err = prober(&mock, ProbeOptions::default().concurrency(0))
        .probe(["a.example"])
        .unwrap_err();

    assert!(matches!(err, NetError::InvalidArgument));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_separate_probes_are_independent() {
    let mock = MockResolver::default().answer("example.com", [93, 184, 216, 34]);
    let prober = prober(&mock, ProbeOptions::default());

    let first = prober.probe_all(["example.com"]).await.unwrap();
    let second = prober.probe_all(["example.com"]).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.calls(), 2);
}
