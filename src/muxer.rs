use super::demuxer::DEFAULT_DURATION;
use super::key::LdsKey;
use super::packet::{KlvPacket, Standard};
use super::set::{LocalSet, UniversalSet};
use super::st1108::MetricPeriodPack;
use super::timeline::{Interval, Timeline};
use super::value::Value;
use super::{st0104, st0601, st0806, st0903, st1002, st1108, st1204};
use super::{Error, ErrorDetails, Result};
use log::warn;
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};

// Parent-set fields that, together, identify one 1108 metric group.
const PARENT_TAGS_1108: [LdsKey; 8] = [
    st1108::tag::ASSESSMENT_POINT,
    st1108::tag::WINDOW_CORNERS_PACK,
    st1108::tag::COMPRESSION_TYPE,
    st1108::tag::COMPRESSION_PROFILE,
    st1108::tag::COMPRESSION_LEVEL,
    st1108::tag::COMPRESSION_RATIO,
    st1108::tag::STREAM_BITRATE,
    st1108::tag::DOCUMENT_VERSION,
];

// The parent-field tuple used to decide whether two 1108 sets are mergeable.
fn parent_tuple_1108(set: &LocalSet) -> Vec<Value> {
    PARENT_TAGS_1108
        .iter()
        .map(|&tag| set.at(tag).ok().cloned().unwrap_or_default())
        .collect()
}

fn period_of_1108(set: &LocalSet) -> Option<MetricPeriodPack> {
    set.at(st1108::tag::METRIC_PERIOD_PACK)
        .ok()
        .and_then(|value| value.as_metric_period().ok().copied())
}

fn cmp_1108(lhs: &LocalSet, rhs: &LocalSet) -> Ordering {
    parent_tuple_1108(lhs).cmp(&parent_tuple_1108(rhs))
}

fn timed_cmp_1108(lhs: &LocalSet, rhs: &LocalSet) -> Ordering {
    cmp_1108(lhs, rhs).then_with(|| period_of_1108(lhs).cmp(&period_of_1108(rhs)))
}

/// Walks a [`Timeline`] back out into a chronological stream of KLV packets.
///
/// The caller declares the frame times it cares about with
/// [`Muxer::send_frame`], in non-decreasing order, and collects the packets
/// for each frame with [`Muxer::receive_frame`]. For every frame, each
/// standard present on the timeline produces at most one packet (except the
/// unknown-packet standard, which re-emits its stored packets verbatim, and
/// ST 1108, whose metric periods are merged across frames before emission).
pub struct Muxer<'a> {
    timeline: &'a Timeline,
    packets: BTreeMap<u64, Vec<KlvPacket>>,
    frames: VecDeque<u64>,
    prev_frame: u64,
    cached_1108: Vec<LocalSet>,
}

impl<'a> Muxer<'a> {
    /// Creates a muxer draining `timeline`.
    pub fn new(timeline: &'a Timeline) -> Self {
        Self {
            timeline,
            packets: BTreeMap::new(),
            frames: VecDeque::new(),
            prev_frame: 0,
            cached_1108: Vec::new(),
        }
    }

    /// The timeline being drained.
    pub fn timeline(&self) -> &Timeline {
        self.timeline
    }

    /// Forgets all queued frames, pending packets, and merge state.
    pub fn reset(&mut self) {
        self.packets.clear();
        self.frames.clear();
        self.prev_frame = 0;
        self.cached_1108.clear();
    }

    /// Produces the packets for one frame at `timestamp`.
    ///
    /// Frames must be sent in non-decreasing timestamp order; out-of-order
    /// frames are queued but produce no packets.
    pub fn send_frame(&mut self, timestamp: u64) {
        self.frames.push_back(timestamp);
        if !self.check_timestamp(timestamp) {
            return;
        }

        self.send_frame_unknown(timestamp);
        self.send_frame_local_set(Standard::Misb0102, timestamp, None);
        self.send_frame_0104(timestamp);
        self.send_frame_0601(timestamp);
        self.send_frame_local_set(Standard::Misb0806, timestamp, Some(st0806::tag::TIMESTAMP));
        self.send_frame_local_set(
            Standard::Misb0903,
            timestamp,
            Some(st0903::tag::PRECISION_TIMESTAMP),
        );
        self.send_frame_local_set(
            Standard::Misb1002,
            timestamp,
            Some(st1002::tag::PRECISION_TIMESTAMP),
        );
        self.send_frame_1108(timestamp);
        self.send_frame_local_set(Standard::Misb1202, timestamp, None);
        self.send_frame_1204(timestamp);
        self.send_frame_local_set(Standard::Misb1206, timestamp, None);
        self.send_frame_local_set(Standard::Misb1601, timestamp, None);

        self.prev_frame = timestamp;
    }

    /// The timestamp of the next frame to be received, or `u64::MAX` when no
    /// frames are queued.
    pub fn next_frame_time(&self) -> u64 {
        self.frames.front().copied().unwrap_or(u64::MAX)
    }

    /// Returns all packets belonging to the oldest sent frame, in timestamp
    /// order.
    ///
    /// Fails with [`ErrorDetails::MoreFramesThanSent`] when called more
    /// times than [`Muxer::send_frame`].
    pub fn receive_frame(&mut self) -> Result<Vec<KlvPacket>> {
        let frame = match self.frames.front() {
            Some(&frame) => frame,
            None => return Err(Error::new(0, ErrorDetails::MoreFramesThanSent)),
        };
        self.flush_frame(frame);
        self.frames.pop_front();

        let remaining = self.packets.split_off(&frame.saturating_add(1));
        let emitted = std::mem::replace(&mut self.packets, remaining);
        Ok(emitted.into_values().flatten().collect())
    }

    fn push_packet(&mut self, timestamp: u64, packet: KlvPacket) {
        self.packets.entry(timestamp).or_default().push(packet);
    }

    // ------------------------------------------------------------------------
    // Emit pending 1108 merges whose period starts at or before the frame
    // being received. Later periods stay cached; they may still grow.
    fn flush_frame(&mut self, frame: u64) {
        let cached = std::mem::take(&mut self.cached_1108);
        for set in cached {
            let timestamp = period_of_1108(&set).map(|period| period.timestamp).unwrap_or(0);
            if timestamp <= frame {
                self.push_packet(timestamp, KlvPacket::new(st1108::key(), set));
            } else {
                self.cached_1108.push(set);
            }
        }
    }

    // ------------------------------------------------------------------------
    fn send_frame_unknown(&mut self, timestamp: u64) {
        let window = Interval::new(self.prev_frame, timestamp);
        let mut replayed: Vec<(u64, KlvPacket)> = Vec::new();
        for (_, timeline) in self.timeline.find_all(Standard::Unknown) {
            for (interval, value) in timeline.find_interval(window) {
                if let Ok(packets) = value.as_packets() {
                    for packet in packets {
                        // Each packet re-emits at its original timestamp
                        replayed.push((interval.lower, packet.clone()));
                    }
                }
            }
        }
        for (original_timestamp, packet) in replayed {
            self.push_packet(original_timestamp, packet);
        }
    }

    // ------------------------------------------------------------------------
    fn send_frame_0104(&mut self, timestamp: u64) {
        let lookup = st0104::traits();

        // Create a set of all tags in effect at this frame
        let mut set = UniversalSet::new();
        for (key, timeline) in self.timeline.find_all(Standard::Misb0104) {
            if let Some((_, value)) = timeline.find(timestamp) {
                set.add(lookup.by_tag(key.tag).uds_key(), value.clone());
            }
        }

        // If any tags were present, put the set into a packet and ship it
        if !set.is_empty() {
            set.add(
                lookup
                    .by_tag(st0104::tag::USER_DEFINED_TIMESTAMP)
                    .uds_key(),
                timestamp,
            );
            self.push_packet(timestamp, KlvPacket::new(st0104::key(), set));
        }
    }

    // ------------------------------------------------------------------------
    fn send_frame_0601(&mut self, timestamp: u64) {
        let standard = Standard::Misb0601;
        let lookup = st0601::traits();
        let window = Interval::new(self.prev_frame, timestamp);

        // No Report-On-Change bandwidth savings yet; every frame carries all
        // data in effect
        let mut set = LocalSet::new();
        let mut wavelength_list = Vec::new();
        let mut payload_list = Vec::new();
        let mut waypoint_list = Vec::new();
        let mut verification_list: Vec<u64> = Vec::new();
        for (key, timeline) in self.timeline.find_all(standard) {
            let tag = key.tag;

            // The emitted set gets a fresh timestamp appended below
            if tag == st0601::tag::PRECISION_TIMESTAMP {
                continue;
            }

            // Tags which only make sense as point occurrences are drained
            // over the window since the previous frame
            if matches!(
                tag,
                st0601::tag::WEAPON_FIRED
                    | st0601::tag::CONTROL_COMMAND_VERIFICATION_LIST
                    | st0601::tag::SEGMENT_LOCAL_SET
                    | st0601::tag::AMEND_LOCAL_SET
            ) {
                for (_, value) in timeline.find_interval(window) {
                    match tag {
                        st0601::tag::CONTROL_COMMAND_VERIFICATION_LIST => {
                            if let Ok(ids) = value.as_u64_list() {
                                verification_list.extend_from_slice(ids);
                            }
                        }
                        st0601::tag::WEAPON_FIRED => {
                            // Multiples not allowed; keep only the most recent
                            set.erase(tag);
                            set.add(tag, value.clone());
                        }
                        _ => set.add(tag, value.clone()),
                    }
                }
                continue;
            }

            // Tags which hold a value over time
            if let Some((_, value)) = timeline.find(timestamp) {
                match tag {
                    // List tags accumulate records across indices
                    st0601::tag::WAVELENGTHS_LIST => {
                        if let Ok(records) = value.as_wavelength_list() {
                            wavelength_list.extend(records.iter().cloned());
                        }
                    }
                    st0601::tag::PAYLOAD_LIST => {
                        if let Ok(records) = value.as_payload_list() {
                            payload_list.extend(records.iter().cloned());
                        }
                    }
                    st0601::tag::WAYPOINT_LIST => {
                        if let Ok(records) = value.as_waypoint_list() {
                            waypoint_list.extend(records.iter().cloned());
                        }
                    }
                    _ => set.add(tag, value.clone()),
                }
            } else if lookup.by_tag(tag).count().upper() == 1 {
                // The tag is no longer in effect. If its last entry ended
                // early, downstream consumers must be told to drop the value
                // explicitly; only possible for single-instance tags.
                if let Some((interval, _)) = timeline.find(self.prev_frame) {
                    if interval.span() < DEFAULT_DURATION {
                        set.add(tag, Value::empty());
                    }
                }
            }
        }

        // Put any assembled lists into the packet
        if !wavelength_list.is_empty() {
            set.add(st0601::tag::WAVELENGTHS_LIST, wavelength_list);
        }
        if !payload_list.is_empty() {
            set.add(st0601::tag::PAYLOAD_LIST, payload_list);
        }
        if !waypoint_list.is_empty() {
            set.add(st0601::tag::WAYPOINT_LIST, waypoint_list);
        }
        if !verification_list.is_empty() {
            set.add(
                st0601::tag::CONTROL_COMMAND_VERIFICATION_LIST,
                verification_list,
            );
        }

        // If any tags were present, put the set into a packet and ship it
        if !set.is_empty() {
            set.add(st0601::tag::PRECISION_TIMESTAMP, timestamp);
            self.push_packet(timestamp, KlvPacket::new(st0601::key(), set));
        }
    }

    // ------------------------------------------------------------------------
    fn send_frame_1108(&mut self, timestamp: u64) {
        let standard = Standard::Misb1108;
        let lookup = st1108::traits();

        // Find each change to each metric within the span of this frame,
        // assembling a provisional set whenever every mandatory parent field
        // is in effect
        let mut sets: Vec<LocalSet> = Vec::new();
        for (key, metric_timeline) in
            self.timeline.find_all_tag(standard, st1108::tag::METRIC_LOCAL_SET)
        {
            let index = key.index;
            let mut start = self.prev_frame;
            while start < timestamp {
                let mut next = timestamp;
                let mut upper = timestamp;
                let mut set = LocalSet::new();
                let mut valid = true;
                for &tag in &PARENT_TAGS_1108 {
                    let mandatory = lookup.by_tag(tag).count().is_mandatory();
                    let timeline = match self.timeline.get(standard, tag, index) {
                        Some(timeline) => timeline,
                        None => {
                            // This field is never present
                            if mandatory {
                                valid = false;
                                break;
                            }
                            continue;
                        }
                    };
                    let range = timeline.find_interval(Interval::new(start, timestamp));
                    if range.is_empty() {
                        // This field is not present during this frame
                        if mandatory {
                            valid = false;
                            break;
                        }
                    } else if !range[0].0.contains(start) {
                        // This field is present later in the frame, not now
                        next = next.min(range[0].0.lower);
                        if mandatory {
                            valid = false;
                            break;
                        }
                    } else {
                        // This field is present now
                        set.add(tag, range[0].1.clone());
                        next = next.min(range[0].0.upper);
                        upper = upper.min(range[0].0.upper);
                    }
                }

                // If a set could be assembled, keep it
                if valid {
                    if let Some((_, metric_value)) = metric_timeline.find(start) {
                        set.add(
                            st1108::tag::METRIC_PERIOD_PACK,
                            MetricPeriodPack {
                                timestamp: start,
                                offset: (upper - start) as u32,
                            },
                        );
                        set.add(st1108::tag::METRIC_LOCAL_SET, metric_value.clone());
                        sets.push(set);
                    }
                }

                // Go to the next change in the metric this frame
                if next <= start {
                    break;
                }
                start = next;
            }
        }

        // Sort the provisional sets so compatible ones end up adjacent, then
        // merge runs that share a parent tuple and period
        sets.sort_by(timed_cmp_1108);
        let mut merged: Vec<LocalSet> = Vec::new();
        let mut i = 0;
        while i < sets.len() {
            let mut set = sets[i].clone();
            let mut j = i + 1;
            while j < sets.len() && timed_cmp_1108(&sets[i], &sets[j]) == Ordering::Equal {
                if let Ok(metric) = sets[j].at(st1108::tag::METRIC_LOCAL_SET) {
                    set.add(st1108::tag::METRIC_LOCAL_SET, metric.clone());
                }
                j += 1;
            }
            i = j;
            merged.push(set);
        }

        // Fold into the merge cache: a cached packet's period is extended
        // when the new period continues it and everything else is equal
        for set in merged {
            let period = match period_of_1108(&set) {
                Some(period) => period,
                None => continue,
            };
            let mut stripped = set.clone();
            stripped.erase(st1108::tag::METRIC_PERIOD_PACK);

            let mut was_merged = false;
            for cached in self.cached_1108.iter_mut() {
                let cached_period = match period_of_1108(cached) {
                    Some(cached_period) => cached_period,
                    None => continue,
                };
                let mut cached_stripped = cached.clone();
                cached_stripped.erase(st1108::tag::METRIC_PERIOD_PACK);
                if period.timestamp <= cached_period.timestamp + u64::from(cached_period.offset)
                    && stripped == cached_stripped
                {
                    let extended = MetricPeriodPack {
                        timestamp: cached_period.timestamp,
                        offset: (period.timestamp + u64::from(period.offset)
                            - cached_period.timestamp) as u32,
                    };
                    cached.erase(st1108::tag::METRIC_PERIOD_PACK);
                    cached.add(st1108::tag::METRIC_PERIOD_PACK, extended);
                    was_merged = true;
                    break;
                }
            }
            if !was_merged {
                self.cached_1108.push(set);
            }
        }
    }

    // ------------------------------------------------------------------------
    fn send_frame_1204(&mut self, timestamp: u64) {
        let mut emitted: Vec<KlvPacket> = Vec::new();
        for (_, timeline) in self.timeline.find_all(Standard::Misb1204) {
            if let Some((_, value)) = timeline.find(timestamp) {
                emitted.push(KlvPacket::new(st1204::key(), value.clone()));
            }
        }
        for packet in emitted {
            self.push_packet(timestamp, packet);
        }
    }

    // ------------------------------------------------------------------------
    fn send_frame_local_set(
        &mut self,
        standard: Standard,
        timestamp: u64,
        timestamp_tag: Option<LdsKey>,
    ) {
        // Create a set of all tags in effect at this frame
        let mut set = LocalSet::new();
        for (key, timeline) in self.timeline.find_all(standard) {
            if let Some((_, value)) = timeline.find(timestamp) {
                set.add(key.tag, value.clone());
            }
        }

        // If any tags were present, put the set into a packet and ship it
        if !set.is_empty() {
            if let Some(tag) = timestamp_tag {
                set.add(tag, timestamp);
            }
            self.push_packet(timestamp, KlvPacket::new(standard.uds_key(), set));
        }
    }

    // ------------------------------------------------------------------------
    // Frames can only be emitted in chronological order.
    fn check_timestamp(&self, timestamp: u64) -> bool {
        let result = timestamp >= self.prev_frame;
        if !result {
            warn!(
                "muxer: refusing to emit packets out-of-order ( {} less than {} )",
                timestamp, self.prev_frame
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::st1108::{metric_tag, MetricImplementer};
    use crate::Demuxer;

    fn metric_set(name: &str, time: u64, value: f64) -> LocalSet {
        let mut set = LocalSet::new();
        set.add(metric_tag::NAME, name);
        set.add(metric_tag::VERSION, "1.0");
        set.add(
            metric_tag::IMPLEMENTER,
            MetricImplementer {
                organization: "Example Org".to_owned(),
                subgroup: "Quality".to_owned(),
            },
        );
        set.add(metric_tag::PARAMETERS, "");
        set.add(metric_tag::TIME, time);
        set.add(metric_tag::VALUE, value);
        set
    }

    fn parent_1108(period: MetricPeriodPack, metric: LocalSet) -> LocalSet {
        let mut set = LocalSet::new();
        set.add(st1108::tag::ASSESSMENT_POINT, crate::ValueData::Enumeration(2));
        set.add(st1108::tag::METRIC_PERIOD_PACK, period);
        set.add(st1108::tag::METRIC_LOCAL_SET, metric);
        set.add(st1108::tag::COMPRESSION_TYPE, crate::ValueData::Enumeration(2));
        set.add(
            st1108::tag::COMPRESSION_PROFILE,
            crate::ValueData::Enumeration(4),
        );
        set.add(st1108::tag::COMPRESSION_LEVEL, "5.1");
        set.add(st1108::tag::COMPRESSION_RATIO, 22.5_f64);
        set.add(st1108::tag::STREAM_BITRATE, 4000_u64);
        set.add(st1108::tag::DOCUMENT_VERSION, 3_u64);
        set
    }

    #[test]
    fn adjacent_equal_1108_periods_merge() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);

        let metric = metric_set("VNIIRS", 1_000, 5.5);
        demuxer.demux_packet(&KlvPacket::new(
            st1108::key(),
            parent_1108(
                MetricPeriodPack {
                    timestamp: 1_000,
                    offset: 100,
                },
                metric.clone(),
            ),
        ));
        demuxer.demux_packet(&KlvPacket::new(
            st1108::key(),
            parent_1108(
                MetricPeriodPack {
                    timestamp: 1_100,
                    offset: 100,
                },
                metric,
            ),
        ));

        let mut muxer = Muxer::new(&timeline);
        muxer.send_frame(2_000);
        let packets = muxer.receive_frame().unwrap();
        let emitted: Vec<&KlvPacket> = packets
            .iter()
            .filter(|packet| packet.standard() == Standard::Misb1108)
            .collect();
        assert_eq!(emitted.len(), 1);

        let set = emitted[0].value.as_local_set().unwrap();
        let period = period_of_1108(set).unwrap();
        assert_eq!(period.timestamp, 1_000);
        assert_eq!(period.offset, 200);
    }

    #[test]
    fn receive_without_send_is_an_error() {
        let timeline = Timeline::new();
        let mut muxer = Muxer::new(&timeline);
        assert_eq!(
            muxer.receive_frame().unwrap_err().details,
            ErrorDetails::MoreFramesThanSent
        );
        assert_eq!(muxer.next_frame_time(), u64::MAX);
    }

    #[test]
    fn out_of_order_frames_produce_nothing() {
        let mut timeline = Timeline::new();
        let mut demuxer = Demuxer::new(&mut timeline);
        let mut set = LocalSet::new();
        set.add(crate::st0601::tag::PRECISION_TIMESTAMP, 5_000_u64);
        set.add(crate::st0601::tag::VERSION_NUMBER, 17_u64);
        demuxer.demux_packet(&KlvPacket::new(crate::st0601::key(), set));

        let mut muxer = Muxer::new(&timeline);
        muxer.send_frame(6_000);
        muxer.send_frame(5_500);
        assert!(!muxer.receive_frame().unwrap().is_empty());
        assert!(muxer.receive_frame().unwrap().is_empty());
    }
}
