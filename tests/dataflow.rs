use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::unbounded;
use dataflow_nn::{
    connect, ActivationFunction, Group, Layer, LinkId, Neuron, Publisher,
};

#[test]
fn connect_creates_m_times_n_uniquely_owned_links() {
    let from = Layer::new("from", 4);
    let to = Layer::new("to", 3);
    let links = connect(&from, &to);
    assert_eq!(links.len(), 12);

    let mut out_owners: HashMap<LinkId, usize> = HashMap::new();
    let mut in_owners: HashMap<LinkId, usize> = HashMap::new();
    for o in from.outputs().into_iter().chain(to.outputs()) {
        for l in o.links() {
            *out_owners.entry(l.id()).or_default() += 1;
        }
    }
    for i in from.inputs().into_iter().chain(to.inputs()) {
        for l in i.links() {
            *in_owners.entry(l.id()).or_default() += 1;
        }
    }
    for l in &links {
        assert_eq!(out_owners.get(&l.id()), Some(&1));
        assert_eq!(in_owners.get(&l.id()), Some(&1));
    }
    assert_eq!(out_owners.len(), 12);
    assert_eq!(in_owners.len(), 12);
}

#[test]
fn publication_reaches_neuron_sum_once_with_link_weight() {
    let (tx, rx) = unbounded();
    let neuron = Neuron::builder()
        .on_receive(move |_, sum| {
            tx.send(sum).ok();
            Ok(())
        })
        .build();
    let publication = neuron.input().publish();
    assert_eq!(publication.links().len(), 1);
    publication.links()[0].set_weight(2.0);
    neuron.activate().unwrap();

    publication.send(1.0).unwrap();
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2.0);
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn wide_fan_in_sums_every_peer_exactly_once() {
    let upstream = Layer::builder("upstream")
        .size(16, ActivationFunction::Identity)
        .build();
    let sink = Layer::builder("sink").size(1, ActivationFunction::Identity).build();
    let feeds: Vec<_> = upstream.neurons().iter().map(|n| n.input().publish()).collect();
    let links = connect(&upstream, &sink);
    for (i, link) in links.iter().enumerate() {
        link.set_weight(i as f64);
    }
    let subscription = sink.neurons()[0].subscribe();
    upstream.activate().unwrap();
    sink.activate().unwrap();

    for round in 0..3 {
        // Feed peers back to front so they finish out of registration order.
        for (i, feed) in feeds.iter().enumerate().rev() {
            feed.send((i + round) as f64).unwrap();
        }
        let expected: f64 = (0..16).map(|i| i as f64 * (i + round) as f64).sum();
        let got = subscription
            .result_timeout(Duration::from_secs(5))
            .unwrap()
            .expect("sink fired");
        assert_eq!(got, expected);
    }
}

#[test]
fn layers_run_concurrently_and_pipeline_results() {
    let publisher = Publisher::new(2);
    let hidden = Layer::new("hidden", 3);
    let out = Layer::new("out", 2);
    connect(&publisher, &hidden);
    connect(&hidden, &out);
    let subscriptions: Vec<_> = out.neurons().iter().map(|n| n.subscribe()).collect();
    hidden.activate().unwrap();
    out.activate().unwrap();

    let publications = publisher.publications();
    let mut seen = Vec::new();
    for _ in 0..2 {
        for p in &publications {
            p.send(0.5).unwrap();
        }
        let values: Vec<f64> = subscriptions.iter().map(|s| s.result().unwrap()).collect();
        seen.push(values);
    }
    assert_eq!(seen[0], seen[1]);
    assert!(seen[0].iter().all(|&v| v > 0.0 && v < 1.0));
    assert!(out.neurons().iter().all(|n| Arc::strong_count(n) >= 2));
}
