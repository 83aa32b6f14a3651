//! Unit tests for ft-traffic.

#[cfg(test)]
mod helpers {
    use ft_core::{DupAckConfig, FatTreeDims, HostIndex, SimTime, SocketKind};
    use ft_fabric::{FabricBuilder, StaticFabric};

    use crate::{
        Connection, DupAckPolicy, FlowHandle, FlowInstaller, FlowLauncher, FlowSpec, LocalityClassifier,
    };

    pub struct Installed {
        pub spec:  FlowSpec,
        pub start: Option<SimTime>,
        pub stop:  Option<SimTime>,
    }

    /// Transport stand-in that records every installed flow.
    #[derive(Default)]
    pub struct RecordingInstaller {
        pub flows: Vec<Installed>,
    }

    pub struct RecordingHandle<'a>(&'a mut Installed);

    impl FlowHandle for RecordingHandle<'_> {
        fn start_after(&mut self, delay: SimTime) {
            self.0.start = Some(delay);
        }

        fn stop_after(&mut self, delay: SimTime) {
            self.0.stop = Some(delay);
        }
    }

    impl FlowInstaller for RecordingInstaller {
        type Handle<'a>
            = RecordingHandle<'a>
        where
            Self: 'a;

        fn install_flow(&mut self, spec: &FlowSpec) -> RecordingHandle<'_> {
            self.flows.push(Installed { spec: spec.clone(), start: None, stop: None });
            RecordingHandle(self.flows.last_mut().unwrap())
        }
    }

    pub fn dims() -> FatTreeDims {
        FatTreeDims::new(4, 1).unwrap()
    }

    pub fn fabric() -> StaticFabric {
        FabricBuilder::new(dims()).build()
    }

    pub fn launcher(socket: SocketKind) -> FlowLauncher {
        let classifier = LocalityClassifier::new(&dims());
        let cfg = DupAckConfig::default();
        FlowLauncher::new(classifier, DupAckPolicy::new(classifier, socket, cfg.auto, cfg.static_threshold))
    }

    /// `i -> (i + shift) % n` over every host.
    pub fn shifted_matrix(shift: u32) -> Vec<Connection> {
        let n = dims().total_host();
        (0..n).map(|i| Connection::new(HostIndex(i), HostIndex((i + shift) % n))).collect()
    }
}

#[cfg(test)]
mod flow_size {
    use approx::assert_relative_eq;

    use ft_core::{FlowSizeConfig, FlowSizeMode, SimRng, SocketKind};

    use crate::{CdfPoint, FlowSizeCdf, FlowSizeModel, TrafficError};

    #[test]
    fn exact_table_hits() {
        let cdf = FlowSizeCdf::default();
        assert_eq!(cdf.invert(0.5), 1);
        assert_eq!(cdf.invert(0.825), 72);
        assert_eq!(cdf.invert(1.0), 2107);
    }

    #[test]
    fn zero_is_one_packet() {
        assert_eq!(FlowSizeCdf::default().invert(0.0), 1);
    }

    #[test]
    fn between_points_interpolates() {
        let cdf = FlowSizeCdf::default();
        // nearest point is (2, 0.6); u lies above it, so the segment is (2, 0.6)..(3, 0.7)
        let x = cdf.interpolate(0.6125);
        assert_relative_eq!(x, 2.125, epsilon = 1e-9);
        assert!(x > 2.0 && x < 3.0);
        assert_eq!(cdf.invert(0.6125), 2);

        // below the nearest point: (267, 0.9)..(1187, 0.95)
        assert_relative_eq!(cdf.interpolate(0.94), 1003.0, epsilon = 1e-6);
    }

    #[test]
    fn monotone_in_u() {
        let cdf = FlowSizeCdf::default();
        let mut prev = 0;
        for i in 0..=1000 {
            let size = cdf.invert(i as f64 / 1000.0);
            assert!(size >= prev, "invert not monotone at u = {}", i as f64 / 1000.0);
            prev = size;
        }
    }

    #[test]
    fn tie_prefers_earlier_point() {
        let cdf = FlowSizeCdf::from_points(vec![
            CdfPoint { size_packets: 1, probability: 0.0 },
            CdfPoint { size_packets: 10, probability: 0.4 },
            CdfPoint { size_packets: 20, probability: 0.6 },
            CdfPoint { size_packets: 30, probability: 1.0 },
        ])
        .unwrap();
        // 0.5 is equidistant from 0.4 and 0.6; the earlier point wins and u
        // is above it, so the segment is still (10, 0.4)..(20, 0.6).
        assert_relative_eq!(cdf.interpolate(0.5), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn extrapolates_past_last_point() {
        let cdf = FlowSizeCdf::from_points(vec![
            CdfPoint { size_packets: 1, probability: 0.0 },
            CdfPoint { size_packets: 100, probability: 0.5 },
        ])
        .unwrap();
        assert_relative_eq!(cdf.interpolate(0.75), 149.5, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_tables() {
        let p = |s, y| CdfPoint { size_packets: s, probability: y };
        for points in [
            vec![p(1, 0.0)],
            vec![p(1, 0.0), p(2, 0.0)],
            vec![p(2, 0.0), p(1, 0.5)],
            vec![p(0, 0.0), p(1, 0.5)],
            vec![p(1, 0.0), p(2, 1.5)],
        ] {
            assert!(matches!(FlowSizeCdf::from_points(points), Err(TrafficError::InvalidCdf(_))));
        }
    }

    #[test]
    fn uniform_sizes_are_whole_kib_in_range() {
        let cfg = FlowSizeConfig::default();
        let mut rng = SimRng::new(7);

        let narrow = FlowSizeModel::new(&cfg, SocketKind::Tcp, 1400).unwrap();
        for _ in 0..1000 {
            let b = narrow.sample(&mut rng);
            assert_eq!(b % 1024, 0);
            assert!((1024..=(100_000 / 1024) * 1024).contains(&b));
        }

        let wide = FlowSizeModel::new(&cfg, SocketKind::Mmptcp, 1400).unwrap();
        let max = (0..5000).map(|_| wide.sample(&mut rng)).max().unwrap();
        assert!(max > 100_000, "wide range never exceeded the narrow bound");
        assert!(max <= 1024 * 1024);
    }

    #[test]
    fn cdf_sizes_are_segment_multiples() {
        let cfg = FlowSizeConfig { mode: FlowSizeMode::EmpiricalCdf, ..FlowSizeConfig::default() };
        let model = FlowSizeModel::new(&cfg, SocketKind::Tcp, 1400).unwrap();
        let mut rng = SimRng::new(3);
        for _ in 0..500 {
            let b = model.sample(&mut rng);
            assert_eq!(b % 1400, 0);
            assert!((1400..=2107 * 1400).contains(&b));
        }
    }

    #[test]
    fn fixed_size_is_constant() {
        let cfg = FlowSizeConfig { mode: FlowSizeMode::Fixed { bytes: 70_000 }, ..FlowSizeConfig::default() };
        let model = FlowSizeModel::new(&cfg, SocketKind::Mmptcp, 1400).unwrap();
        let mut rng = SimRng::new(0);
        assert!((0..10).all(|_| model.sample(&mut rng) == 70_000));
    }

    #[test]
    fn sub_kib_threshold_is_rejected() {
        let cfg = FlowSizeConfig { threshold_bytes: 1000, ..FlowSizeConfig::default() };
        assert!(matches!(
            FlowSizeModel::new(&cfg, SocketKind::Tcp, 1400),
            Err(TrafficError::InvalidSizeRange(_))
        ));
    }
}

#[cfg(test)]
mod locality {
    use std::net::Ipv4Addr;

    use ft_core::{FlowKind, SocketKind};

    use super::helpers::dims;
    use crate::{DupAckPolicy, FlowCounters, LocalityClassifier, LocalityTier};

    const A: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const SAME_RACK: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 5);
    const SAME_POD: Ipv4Addr = Ipv4Addr::new(10, 0, 1, 1);
    const OTHER_POD: Ipv4Addr = Ipv4Addr::new(10, 2, 0, 1);

    #[test]
    fn classify_by_octets() {
        let c = LocalityClassifier::new(&dims());
        assert_eq!(c.classify(A, SAME_RACK), LocalityTier::SameRack);
        assert_eq!(c.classify(A, SAME_POD), LocalityTier::SamePod);
        assert_eq!(c.classify(A, OTHER_POD), LocalityTier::CrossPod);
        assert_eq!(c.classify(A, A), LocalityTier::SameRack);
    }

    #[test]
    fn retx_threshold_grows_with_distance() {
        let c = LocalityClassifier::new(&dims());
        // k=4: 2 aggr per pod, 4 core switches
        assert_eq!(c.retx_threshold(A, SAME_RACK), 0);
        assert_eq!(c.retx_threshold(A, SAME_POD), 2);
        assert_eq!(c.retx_threshold(A, OTHER_POD), 4);
    }

    #[test]
    fn dup_ack_auto_only_for_spraying_sockets() {
        let c = LocalityClassifier::new(&dims());
        let mmptcp = DupAckPolicy::new(c, SocketKind::Mmptcp, true, 7);
        let scatter = DupAckPolicy::new(c, SocketKind::Scatter, true, 7);
        let tcp = DupAckPolicy::new(c, SocketKind::Tcp, true, 7);
        let off = DupAckPolicy::new(c, SocketKind::Mmptcp, false, 7);

        assert_eq!(mmptcp.threshold(A, OTHER_POD), 4);
        assert_eq!(scatter.threshold(A, SAME_POD), 2);
        assert_eq!(tcp.threshold(A, OTHER_POD), 7);
        assert_eq!(off.threshold(A, OTHER_POD), 7);
        assert!(!tcp.is_auto());
    }

    #[test]
    fn record_touches_one_cell_and_all() {
        let mut fc = FlowCounters::new();
        fc.record(LocalityTier::SamePod, FlowKind::Short);
        fc.record(LocalityTier::SamePod, FlowKind::Large);
        fc.record(LocalityTier::CrossPod, FlowKind::Short);

        assert_eq!(fc.short(), [0, 1, 1]);
        assert_eq!(fc.large(), [0, 1, 0]);
        assert_eq!(fc.all(), [0, 2, 1]);
        for i in 0..3 {
            assert_eq!(fc.all()[i], fc.short()[i] + fc.large()[i]);
        }
        assert_eq!(fc.total(), 3);
        assert_eq!(fc.total_short(), 2);
        assert_eq!(fc.total_large(), 1);
    }

    #[test]
    fn table_layout() {
        let mut fc = FlowCounters::new();
        fc.record(LocalityTier::SameRack, FlowKind::Large);
        fc.record(LocalityTier::CrossPod, FlowKind::Short);
        fc.record(LocalityTier::CrossPod, FlowKind::Short);

        let mut buf = Vec::new();
        fc.write_table(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "FlowType\tTOR\tAggr\tCore");
        assert_eq!(lines[1], "--------\t----\t----\t----");
        assert_eq!(lines[2], "Large    \t1.0 \t0.0 \t0.0 ");
        assert_eq!(lines[3], "Short    \t0.0 \t0.0 \t2.0 ");
        assert_eq!(lines[4], "All      \t1.0 \t0.0 \t2.0 ");
    }
}

#[cfg(test)]
mod launch {
    use std::net::Ipv4Addr;

    use ft_core::{FlowKind, HostIndex, SimTime, SocketKind};
    use ft_fabric::{AddressBook, FabricResult};

    use super::helpers::{launcher, RecordingInstaller};
    use crate::{Connection, TrafficError};

    /// Every host answers from the same rack.
    struct OneRack;

    impl AddressBook for OneRack {
        fn local_address(&self, host: HostIndex) -> FabricResult<Ipv4Addr> {
            Ok(Ipv4Addr::new(10, 0, 0, 1 + (host.0 % 2) as u8 * 4))
        }
    }

    #[test]
    fn port_is_destination_plus_one() {
        let mut l = launcher(SocketKind::Tcp);
        let mut inst = RecordingInstaller::default();
        let conn = Connection::new(HostIndex(0), HostIndex(65_534));
        let spec = l
            .launch(&mut inst, &OneRack, &conn, FlowKind::Short, 1_000, SimTime::ZERO, SimTime::ONE_SECOND)
            .unwrap();
        assert_eq!(spec.destination_port, u16::MAX);
    }

    #[test]
    fn port_past_u16_is_an_error() {
        let mut l = launcher(SocketKind::Tcp);
        let mut inst = RecordingInstaller::default();
        let conn = Connection::new(HostIndex(0), HostIndex(65_535));
        let err = l
            .launch(&mut inst, &OneRack, &conn, FlowKind::Short, 1_000, SimTime::ZERO, SimTime::ONE_SECOND)
            .unwrap_err();
        assert!(matches!(err, TrafficError::PortOutOfRange(HostIndex(65_535))));
        assert!(inst.flows.is_empty());
        assert_eq!(l.counters().all().iter().sum::<u64>(), 0);
    }
}

#[cfg(test)]
mod connections {
    use std::io::Cursor;

    use ft_core::HostIndex;

    use crate::{Connection, ShortFlowPool, TrafficError, load_connections_reader};

    #[test]
    fn promote_flips_once() {
        let mut c = Connection::new(HostIndex(0), HostIndex(1));
        assert!(!c.is_large());
        c.promote().unwrap();
        assert!(c.is_large());
        assert!(matches!(c.promote(), Err(TrafficError::AlreadyLarge { .. })));
    }

    #[test]
    fn pool_rejects_empty_and_large() {
        assert!(matches!(ShortFlowPool::new(Vec::new()), Err(TrafficError::EmptyConnectionPool)));

        let mut big = Connection::new(HostIndex(0), HostIndex(1));
        big.promote().unwrap();
        assert!(matches!(ShortFlowPool::new(vec![big]), Err(TrafficError::LargeInShortPool { .. })));
    }

    #[test]
    fn pool_from_matrix_skips_promoted() {
        let mut m = vec![
            Connection::new(HostIndex(0), HostIndex(1)),
            Connection::new(HostIndex(1), HostIndex(2)),
            Connection::new(HostIndex(2), HostIndex(0)),
        ];
        m[1].promote().unwrap();
        let pool = ShortFlowPool::from_matrix(&m).unwrap();
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|c| !c.is_large()));
    }

    #[test]
    fn loads_csv() {
        let csv = "source,destination\n0, 5\n1,12\n15,0\n";
        let m = load_connections_reader(Cursor::new(csv), 16).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m[1], Connection::new(HostIndex(1), HostIndex(12)));
        assert!(m.iter().all(|c| !c.is_large()));
    }

    #[test]
    fn csv_host_out_of_range() {
        let csv = "source,destination\n0,5\n3,16\n";
        let err = load_connections_reader(Cursor::new(csv), 16).unwrap_err();
        assert!(matches!(err, TrafficError::HostOutOfRange { index: 1, total: 16, .. }));
    }

    #[test]
    fn csv_garbage_is_parse_error() {
        let csv = "source,destination\nzero,5\n";
        assert!(matches!(load_connections_reader(Cursor::new(csv), 16), Err(TrafficError::Parse(_))));
    }
}

#[cfg(test)]
mod promotion {
    use ft_core::{FlowKind, SimRng, SimTime, SocketKind, TrafficPattern};

    use super::helpers::{RecordingInstaller, fabric, launcher, shifted_matrix};
    use crate::{ShortFlowPool, promote_large_flows, promotion_count};

    #[test]
    fn count_rules() {
        use TrafficPattern::*;
        assert_eq!(promotion_count(16, ShortFlow, Permutation, 33), 5);
        assert_eq!(promotion_count(16, ShortFlow, Incast, 33), 0);
        assert_eq!(promotion_count(16, Permutation, Permutation, 33), 16);
        assert_eq!(promotion_count(16, ShortFlow, Random, 0), 0);
    }

    #[test]
    fn promotes_distinct_connections() {
        let f = fabric();
        let mut m = shifted_matrix(5);
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Mmptcp);
        let mut rng = SimRng::new(11);
        let horizon = SimTime::from_secs(20);

        let picked = promote_large_flows(&mut m, 5, 0, horizon, &mut rng, &mut l, &mut inst, &f).unwrap();

        let mut sorted = picked.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
        assert_eq!(m.iter().filter(|c| c.is_large()).count(), 5);
        assert_eq!(inst.flows.len(), 5);
        assert_eq!(l.counters().total_large(), 5);
        for flow in &inst.flows {
            assert_eq!(flow.spec.kind, FlowKind::Large);
            assert_eq!(flow.spec.size_bytes, 0);
            assert_eq!(flow.start, Some(SimTime::ZERO));
            assert_eq!(flow.stop, Some(horizon));
            assert_eq!(flow.spec.destination_port as u32, flow.spec.destination.0 + 1);
        }

        let pool = ShortFlowPool::from_matrix(&m).unwrap();
        assert_eq!(pool.len(), 11);
    }

    #[test]
    fn promoting_everything_terminates() {
        let f = fabric();
        let mut m = shifted_matrix(1);
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Tcp);
        let mut rng = SimRng::new(0);
        let n = m.len();
        promote_large_flows(&mut m, n, 0, SimTime::ONE_SECOND, &mut rng, &mut l, &mut inst, &f).unwrap();
        assert!(m.iter().all(|c| c.is_large()));
    }
}

#[cfg(test)]
mod arrival {
    use ft_core::{ArrivalConfig, FlowKind, FlowSizeConfig, FlowSizeMode, HostIndex, SimRng, SimTime, SocketKind};

    use super::helpers::{RecordingInstaller, fabric, launcher, shifted_matrix};
    use crate::{
        ArrivalMode, ArrivalProcess, ArrivalState, Firing, FlowSizeModel, ShortFlowPool, TrafficError,
    };

    fn process(mode: ArrivalMode, cfg: &ArrivalConfig, horizon: u64) -> ArrivalProcess {
        let sizes = FlowSizeModel::new(&FlowSizeConfig::default(), SocketKind::Mmptcp, 1400).unwrap();
        let pool = ShortFlowPool::new(shifted_matrix(6)).unwrap();
        ArrivalProcess::new(pool, sizes, mode, cfg, SimTime::from_secs(horizon)).unwrap()
    }

    #[test]
    fn fire_requires_arm() {
        let f = fabric();
        let mut p = process(ArrivalMode::Single, &ArrivalConfig::default(), 20);
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Mmptcp);
        let mut rng = SimRng::new(0);
        let err = p.fire(SimTime::ZERO, &mut rng, &mut l, &mut inst, &f).unwrap_err();
        assert!(matches!(err, TrafficError::InvalidTransition { op: "fire", state: ArrivalState::Idle }));

        p.arm().unwrap();
        assert_eq!(p.state(), ArrivalState::Scheduled);
        assert!(p.arm().is_err());
    }

    #[test]
    fn single_mode_stops_at_cutoff() {
        let f = fabric();
        let cfg = ArrivalConfig { lambda: 256.0, upper_bound_secs: 0.2, ..ArrivalConfig::default() };
        let mut p = process(ArrivalMode::Single, &cfg, 20);
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Mmptcp);
        let mut rng = SimRng::new(42);

        p.arm().unwrap();
        let mut now = SimTime::ZERO;
        let mut fired_at = Vec::new();
        loop {
            fired_at.push(now);
            match p.fire(now, &mut rng, &mut l, &mut inst, &f).unwrap() {
                Firing::Reschedule(gap) => now = now + gap,
                Firing::Terminated => break,
            }
        }

        let (last, earlier) = fired_at.split_last().unwrap();
        assert!(last.as_secs_f64() >= 19.8);
        assert!(earlier.iter().all(|t| t.as_secs_f64() < 19.8));
        assert_eq!(p.state(), ArrivalState::Terminated);
        assert_eq!(p.launched() as usize, fired_at.len());
        assert_eq!(inst.flows.len(), fired_at.len());
        // ~256/s over 19.8 s
        assert!((4000..6500).contains(&fired_at.len()), "got {} arrivals", fired_at.len());
        assert!(p.fire(now, &mut rng, &mut l, &mut inst, &f).is_err());
    }

    #[test]
    fn single_flow_fields() {
        let f = fabric();
        let mut p = process(ArrivalMode::Single, &ArrivalConfig::default(), 20);
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Mmptcp);
        let mut rng = SimRng::new(5);
        p.arm().unwrap();

        let now = SimTime::from_secs(3);
        p.fire(now, &mut rng, &mut l, &mut inst, &f).unwrap();
        let flow = &inst.flows[0];
        assert_eq!(flow.spec.kind, FlowKind::Short);
        assert_eq!(flow.spec.installed_at, now);
        assert_eq!(flow.start, Some(SimTime::ZERO));
        assert_eq!(flow.stop, Some(SimTime::from_secs(17)));
        assert_eq!(flow.spec.destination.0, (flow.spec.source.0 + 6) % 16);
        assert_eq!(flow.spec.flow_id.0, 0);
        assert_eq!(l.counters().total_short(), 1);
    }

    #[test]
    fn stop_never_negative_past_horizon() {
        let f = fabric();
        let mut p = process(ArrivalMode::Single, &ArrivalConfig::default(), 2);
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Tcp);
        let mut rng = SimRng::new(5);
        p.arm().unwrap();
        let out = p.fire(SimTime::from_secs(3), &mut rng, &mut l, &mut inst, &f).unwrap();
        assert_eq!(out, Firing::Terminated);
        assert_eq!(inst.flows[0].stop, Some(SimTime::ZERO));
    }

    #[test]
    fn flow_ids_are_per_source() {
        let f = fabric();
        let mut p = process(ArrivalMode::Incast, &ArrivalConfig::default(), 20);
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Mmptcp);
        let mut rng = SimRng::new(0);
        p.arm().unwrap();
        p.fire(SimTime::ZERO, &mut rng, &mut l, &mut inst, &f).unwrap();
        p.fire(SimTime::from_secs_f64(0.5), &mut rng, &mut l, &mut inst, &f).unwrap();
        assert_eq!(l.flow_ids().count(HostIndex(3)), 2);
        let ids: Vec<_> = inst.flows.iter().filter(|x| x.spec.source == HostIndex(3)).map(|x| x.spec.flow_id.0).collect();
        assert_eq!(ids, [0, 1]);
    }

    #[test]
    fn incast_bursts_every_heartbeat() {
        let f = fabric();
        let cfg = ArrivalConfig {
            upper_bound_secs: 0.2,
            incast_heartbeat_secs: 0.5,
            incast_flow_bytes: 70_000,
            ..ArrivalConfig::default()
        };
        let mut p = process(ArrivalMode::Incast, &cfg, 2);
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Mmptcp);
        let mut rng = SimRng::new(0);
        p.arm().unwrap();

        let mut now = SimTime::ZERO;
        let mut bursts = 0;
        loop {
            bursts += 1;
            match p.fire(now, &mut rng, &mut l, &mut inst, &f).unwrap() {
                Firing::Reschedule(gap) => {
                    assert_eq!(gap, SimTime::from_secs_f64(0.5));
                    now = now + gap;
                }
                Firing::Terminated => break,
            }
        }
        // cutoff 1.8 s: bursts at 0, 0.5, 1.0 and 1.5; only 0.3 s remain after the last
        assert_eq!(bursts, 4);
        assert_eq!(inst.flows.len(), 4 * 16);
        assert!(inst.flows.iter().all(|x| x.spec.size_bytes == 70_000));
    }

    #[test]
    fn fixed_mode_through_single_arrivals() {
        let f = fabric();
        let sizes = FlowSizeModel::new(
            &FlowSizeConfig { mode: FlowSizeMode::Fixed { bytes: 9_000 }, ..FlowSizeConfig::default() },
            SocketKind::Tcp,
            1400,
        )
        .unwrap();
        let pool = ShortFlowPool::new(shifted_matrix(1)).unwrap();
        let mut p =
            ArrivalProcess::new(pool, sizes, ArrivalMode::Single, &ArrivalConfig::default(), SimTime::from_secs(5))
                .unwrap();
        let mut inst = RecordingInstaller::default();
        let mut l = launcher(SocketKind::Tcp);
        let mut rng = SimRng::new(1);
        p.arm().unwrap();
        p.fire(SimTime::ZERO, &mut rng, &mut l, &mut inst, &f).unwrap();
        assert_eq!(inst.flows[0].spec.size_bytes, 9_000);
    }

    #[test]
    fn bad_lambda_rejected() {
        let sizes = FlowSizeModel::new(&FlowSizeConfig::default(), SocketKind::Tcp, 1400).unwrap();
        let pool = ShortFlowPool::new(shifted_matrix(1)).unwrap();
        let cfg = ArrivalConfig { lambda: -1.0, ..ArrivalConfig::default() };
        let res = ArrivalProcess::new(pool, sizes, ArrivalMode::Single, &cfg, SimTime::from_secs(5));
        assert!(matches!(res, Err(TrafficError::InvalidArrival(_))));
    }
}

#[cfg(test)]
mod hotspot {
    use ft_core::{DeviceIndex, Layer, NodeIndex, SimRng};
    use ft_fabric::{DeviceRef, FabricInventory, QueueControl};

    use super::helpers::fabric;
    use crate::{HotspotInjector, TrafficError};

    #[test]
    fn count_is_floor_of_ratio() {
        let h = HotspotInjector::new(Layer::Core, 15, 50).unwrap();
        assert_eq!(h.hotspot_count(16), 2);
        assert_eq!(h.hotspot_count(4), 0);
        assert_eq!(HotspotInjector::new(Layer::Host, 100, 50).unwrap().hotspot_count(16), 16);
    }

    #[test]
    fn ratio_over_100_rejected() {
        assert!(matches!(HotspotInjector::new(Layer::Core, 101, 50), Err(TrafficError::InvalidHotspotRatio(101))));
    }

    #[test]
    fn mutates_exactly_chosen_nodes() {
        let mut f = fabric();
        let h = HotspotInjector::new(Layer::Host, 50, 7).unwrap();
        let mut rng = SimRng::new(9);
        let chosen = h.inject(&mut f, &mut rng);
        assert_eq!(chosen.len(), 8);

        let mut shrunk = 0;
        for n in 0..f.node_count(Layer::Host) as u32 {
            let node = NodeIndex(n);
            let cap = f.queue_capacity(DeviceRef::new(Layer::Host, node, DeviceIndex(1)));
            if chosen.contains(&node) {
                assert_eq!(cap, 7);
                shrunk += 1;
            } else {
                assert_eq!(cap, 100);
            }
            // loopback untouched
            assert_eq!(f.queue_capacity(DeviceRef::new(Layer::Host, node, DeviceIndex::LOOPBACK)), 100);
        }
        assert_eq!(shrunk, 8);
    }

    #[test]
    fn all_links_of_a_hotspot_shrink() {
        let mut f = fabric();
        let h = HotspotInjector::new(Layer::Core, 100, 50).unwrap();
        let chosen = h.inject(&mut f, &mut SimRng::new(1));
        assert_eq!(chosen.len(), 4);
        for node in chosen {
            for d in f.links(Layer::Core, node) {
                assert_eq!(f.queue_capacity(DeviceRef::new(Layer::Core, node, d)), 50);
            }
        }
    }
}
