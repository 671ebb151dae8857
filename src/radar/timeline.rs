use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

/// Evenly spaced frame times ending at the most recent step boundary, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTimeline {
    times: Vec<DateTime<Utc>>,
}

impl FrameTimeline {
    /// `count` frames `step` apart, the last one at `now` rounded down to a whole step.
    pub fn ending_at(now: DateTime<Utc>, count: usize, step: TimeDelta) -> Self {
        let step_secs = step.num_seconds().max(1);
        let secs = now.timestamp();
        let end = DateTime::from_timestamp(secs - secs.rem_euclid(step_secs), 0).unwrap_or(now);
        let step = TimeDelta::seconds(step_secs);

        let times = (0..count)
            .rev()
            .map(|back| end - step * back as i32)
            .collect();

        Self { times }
    }

    #[inline] pub fn len(&self) -> usize { self.times.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.times.is_empty() }

    #[inline] pub fn times(&self) -> &[DateTime<Utc>] { &self.times }

    /// Latest frame time, if any.
    #[inline] pub fn latest(&self) -> Option<&DateTime<Utc>> { self.times.last() }
}

/// WMS TIME value, e.g. `2024-01-15T18:20:00Z`.
pub fn wms_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn thirteen_frames_ten_minutes_apart() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 18, 27, 41).unwrap();
        let timeline = FrameTimeline::ending_at(now, 13, TimeDelta::minutes(10));

        assert_eq!(timeline.len(), 13);
        assert_eq!(wms_time(timeline.latest().unwrap()), "2024-01-15T18:20:00Z");
        assert_eq!(wms_time(&timeline.times()[0]), "2024-01-15T16:20:00Z");
        assert!(timeline.times().windows(2).all(|w| w[1] - w[0] == TimeDelta::minutes(10)));
    }

    #[test]
    fn boundary_time_is_kept() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timeline = FrameTimeline::ending_at(now, 2, TimeDelta::minutes(10));
        assert_eq!(timeline.times(), &[now - TimeDelta::minutes(10), now]);
    }

    #[test]
    fn zero_frames() {
        let timeline = FrameTimeline::ending_at(Utc::now(), 0, TimeDelta::minutes(10));
        assert!(timeline.is_empty());
        assert!(timeline.latest().is_none());
    }
}
