//! Unit tests for ft-telemetry.

#[cfg(test)]
mod store {
    use ft_core::{DeviceIndex, Layer, NodeIndex};

    use crate::{LinkSample, SampleKey, TelemetryError, TelemetryStore};

    fn key(bucket: u32) -> SampleKey {
        SampleKey { layer: Layer::Tor, bucket, node: NodeIndex(1), device: DeviceIndex(2) }
    }

    #[test]
    fn insert_and_get() {
        let mut s = TelemetryStore::new(5);
        let v = LinkSample { utilization: 12.5, loss: 1.0 };
        s.insert(key(3), v).unwrap();
        assert_eq!(s.get(Layer::Tor, 3, NodeIndex(1), DeviceIndex(2)), Some(v));
        assert_eq!(s.get(Layer::Aggr, 3, NodeIndex(1), DeviceIndex(2)), None);
        assert_eq!(s.get_or_zero(Layer::Tor, 4, NodeIndex(1), DeviceIndex(2)), LinkSample::default());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn rejects_overwrite() {
        let mut s = TelemetryStore::new(5);
        s.insert(key(1), LinkSample::default()).unwrap();
        let err = s.insert(key(1), LinkSample { utilization: 1.0, loss: 0.0 }).unwrap_err();
        assert!(matches!(err, TelemetryError::Overwrite(k) if k == key(1)));
        assert_eq!(s.get(Layer::Tor, 1, NodeIndex(1), DeviceIndex(2)), Some(LinkSample::default()));
    }

    #[test]
    fn horizon_bucket_is_inclusive() {
        let mut s = TelemetryStore::new(5);
        s.insert(key(5), LinkSample::default()).unwrap();
        let err = s.insert(key(6), LinkSample::default()).unwrap_err();
        assert!(matches!(err, TelemetryError::BucketOutOfRange { bucket: 6, horizon: 5 }));
    }
}

#[cfg(test)]
mod sampler {
    use approx::assert_relative_eq;

    use ft_core::{DeviceIndex, FatTreeDims, Layer, NodeIndex, SimTime};
    use ft_fabric::{DeviceCounters, DeviceRef, FabricBuilder, StaticFabric};
    use ft_schedule::Firing;

    use crate::{LinkSample, SampleKey, SamplerState, TelemetryError, TelemetrySampler, TelemetryStore};

    const RATE: u64 = 100_000_000;

    fn fabric() -> StaticFabric {
        FabricBuilder::new(FatTreeDims::new(4, 1).unwrap()).build()
    }

    #[test]
    fn idle_device_is_zero_zero() {
        let s = TelemetrySampler::new(Layer::ALL.to_vec(), RATE, SimTime::from_secs(3)).unwrap();
        let v = s.link_sample(0, 0);
        assert_eq!(v.utilization, 0.0);
        assert_eq!(v.loss, 0.0);
    }

    #[test]
    fn percentages() {
        let s = TelemetrySampler::new(Layer::ALL.to_vec(), RATE, SimTime::from_secs(3)).unwrap();
        // 6.25 MB/s on a 100 Mbps link is half the capacity
        let v = s.link_sample(6_250_000, 0);
        assert_relative_eq!(v.utilization, 50.0);
        let v = s.link_sample(750, 250);
        assert_relative_eq!(v.loss, 25.0);
        let v = s.link_sample(0, 10);
        assert_relative_eq!(v.loss, 100.0);
        assert_eq!(v.utilization, 0.0);
    }

    #[test]
    fn fire_reads_resets_and_stores() {
        let mut f = fabric();
        let mut store = TelemetryStore::new(3);
        let mut s = TelemetrySampler::new(vec![Layer::Host, Layer::Core], RATE, SimTime::from_secs(3)).unwrap();

        assert_eq!(s.fire(SimTime::ZERO, &mut f, &mut store).unwrap(), Firing::Reschedule(SimTime::ONE_SECOND));
        // 16 hosts x 1 link + 4 cores x 4 links
        assert_eq!(store.len(), 32);

        let up = f.host_uplink(ft_core::HostIndex(2));
        f.record_received(up, 1_250_000);
        f.record_dropped(up, 1_250_000);
        s.fire(SimTime::ONE_SECOND, &mut f, &mut store).unwrap();

        let v = store.get(Layer::Host, 1, NodeIndex(2), DeviceIndex(1)).unwrap();
        assert_relative_eq!(v.utilization, 10.0);
        assert_relative_eq!(v.loss, 50.0);
        assert_eq!(f.received_bytes(up), 0);
        assert_eq!(f.dropped_bytes(up), 0);

        let other = store.get(Layer::Core, 1, NodeIndex(0), DeviceIndex(1)).unwrap();
        assert_eq!((other.utilization, other.loss), (0.0, 0.0));
        // loopback never sampled
        assert!(store.get(Layer::Host, 1, NodeIndex(2), DeviceIndex::LOOPBACK).is_none());
        // unsampled layer
        assert!(store.get(Layer::Tor, 1, NodeIndex(0), DeviceIndex(1)).is_none());
    }

    #[test]
    fn runs_through_horizon_then_done() {
        let mut f = fabric();
        let mut store = TelemetryStore::new(3);
        let mut s = TelemetrySampler::new(vec![Layer::Host], RATE, SimTime::from_secs(3)).unwrap();

        let mut now = SimTime::ZERO;
        let mut firings = 0;
        while let Firing::Reschedule(d) = s.fire(now, &mut f, &mut store).unwrap() {
            firings += 1;
            now = now + d;
        }
        firings += 1;
        assert_eq!(firings, 4);
        assert_eq!(now, SimTime::from_secs(3));
        assert_eq!(s.state(), SamplerState::Done);
        assert!(matches!(s.fire(now, &mut f, &mut store), Err(TelemetryError::NotArmed(SamplerState::Done))));
    }

    #[test]
    fn values_are_never_negative() {
        let mut f = fabric();
        let mut store = TelemetryStore::new(2);
        let mut s = TelemetrySampler::new(Layer::ALL.to_vec(), RATE, SimTime::from_secs(2)).unwrap();
        s.fire(SimTime::ZERO, &mut f, &mut store).unwrap();
        for (i, n) in (0..8u32).enumerate() {
            let dev = DeviceRef::new(Layer::Tor, NodeIndex(n), DeviceIndex(1 + (i as u32 % 4)));
            f.record_received(dev, (i as u64) * 10_000);
            f.record_dropped(dev, (7 - i as u64) * 1_000);
        }
        s.fire(SimTime::ONE_SECOND, &mut f, &mut store).unwrap();
        for n in 0..8u32 {
            for d in 1..=4u32 {
                let v = store.get(Layer::Tor, 1, NodeIndex(n), DeviceIndex(d)).unwrap();
                assert!(v.utilization >= 0.0);
                assert!((0.0..=100.0).contains(&v.loss));
            }
        }
    }

    #[test]
    fn fractional_time_rejected() {
        let mut f = fabric();
        let mut store = TelemetryStore::new(2);
        let mut s = TelemetrySampler::new(vec![Layer::Host], RATE, SimTime::from_secs(2)).unwrap();
        let err = s.fire(SimTime::from_secs_f64(0.5), &mut f, &mut store).unwrap_err();
        assert!(matches!(err, TelemetryError::FractionalSecond(_)));
        assert_eq!(s.state(), SamplerState::Armed);
    }

    #[test]
    fn rejected_bucket_leaves_counters_untouched() {
        let mut f = fabric();
        let tor = DeviceRef::new(Layer::Tor, NodeIndex(0), DeviceIndex(1));
        let host = DeviceRef::new(Layer::Host, NodeIndex(3), DeviceIndex(1));
        f.record_received(tor, 1_000);
        f.record_received(host, 2_000);

        // The last host uplink of bucket 1 is already taken.
        let mut store = TelemetryStore::new(2);
        let taken = SampleKey { layer: Layer::Host, bucket: 1, node: NodeIndex(15), device: DeviceIndex(1) };
        store.insert(taken, LinkSample::default()).unwrap();

        let mut s = TelemetrySampler::new(vec![Layer::Tor, Layer::Host], RATE, SimTime::from_secs(2)).unwrap();
        let err = s.fire(SimTime::ONE_SECOND, &mut f, &mut store).unwrap_err();
        assert!(matches!(err, TelemetryError::Overwrite(k) if k == taken));
        assert_eq!(s.state(), SamplerState::Armed);
        assert_eq!(f.received_bytes(tor), 1_000);
        assert_eq!(f.received_bytes(host), 2_000);
        assert_eq!(store.len(), 1);

        // A free bucket still goes through.
        assert_eq!(s.fire(SimTime::from_secs(2), &mut f, &mut store).unwrap(), Firing::Terminated);
        assert_eq!(f.received_bytes(tor), 0);
        let v = store.get(Layer::Host, 2, NodeIndex(3), DeviceIndex(1)).unwrap();
        assert_relative_eq!(v.utilization, 2_000.0 * 8.0 * 100.0 / RATE as f64);
    }

    #[test]
    fn duplicate_layers_rejected() {
        assert!(matches!(
            TelemetrySampler::new(vec![Layer::Core, Layer::Host, Layer::Core], RATE, SimTime::ONE_SECOND),
            Err(TelemetryError::DuplicateLayer(Layer::Core))
        ));
    }

    #[test]
    fn zero_link_rate_rejected() {
        assert!(matches!(
            TelemetrySampler::new(vec![Layer::Host], 0, SimTime::ONE_SECOND),
            Err(TelemetryError::ZeroLinkRate)
        ));
    }
}
