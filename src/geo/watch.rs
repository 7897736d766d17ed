use std::time::Duration;

use futures_util::{Stream, StreamExt};

use super::GeoError;

/// One reading from the platform position device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub lat: f64,
    pub lon: f64,
    pub accuracy_m: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct RefineOptions {
    /// Stop refining once a fix is at least this accurate.
    pub target_accuracy_m: f64,
    /// Hard stop even if the target accuracy was never reached.
    pub timeout: Duration,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            target_accuracy_m: 25.0,
            timeout: Duration::from_secs(12),
        }
    }
}

/// Releases the underlying platform watch. Runs exactly once, on drop,
/// whichever way the refine loop exits.
pub struct WatchHandle {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release, for sources without cleanup.
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Consume position fixes until one is accurate enough or time runs out,
/// keeping the best fix seen.
///
/// The watch handle is released on every exit path: target reached,
/// stream ended, timeout, or the future being dropped mid-flight.
pub async fn refine_position<F>(
    mut fixes: F,
    handle: WatchHandle,
    opts: RefineOptions,
) -> Result<PositionFix, GeoError>
where
    F: Stream<Item = PositionFix> + Unpin,
{
    let deadline = tokio::time::sleep(opts.timeout);
    tokio::pin!(deadline);

    let mut best: Option<PositionFix> = None;

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            fix = fixes.next() => match fix {
                None => break,
                Some(fix) => {
                    if best.map_or(true, |b| fix.accuracy_m < b.accuracy_m) {
                        best = Some(fix);
                    }
                    if fix.accuracy_m <= opts.target_accuracy_m {
                        break;
                    }
                }
            }
        }
    }

    drop(handle);
    best.ok_or(GeoError::NoFix)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use futures_util::stream;

    use super::*;

    fn fix(accuracy_m: f64) -> PositionFix {
        PositionFix { lat: 6.68, lon: -1.62, accuracy_m }
    }

    fn released_flag() -> (WatchHandle, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let flag = released.clone();
        let handle = WatchHandle::new(move || flag.store(true, Ordering::SeqCst));
        (handle, released)
    }

    #[tokio::test]
    async fn stops_at_target_accuracy_and_releases_watch() {
        let fixes = stream::iter(vec![fix(120.0), fix(60.0), fix(20.0), fix(5.0)]);
        let (handle, released) = released_flag();

        let best = refine_position(fixes, handle, RefineOptions::default())
            .await
            .unwrap();
        // stopped at the first fix within target, never saw the 5m one
        assert_eq!(best.accuracy_m, 20.0);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn keeps_best_fix_when_stream_ends_above_target() {
        let fixes = stream::iter(vec![fix(120.0), fix(80.0), fix(95.0)]);
        let (handle, released) = released_flag();

        let best = refine_position(fixes, handle, RefineOptions::default())
            .await
            .unwrap();
        assert_eq!(best.accuracy_m, 80.0);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_stream_is_no_fix_but_still_releases() {
        let fixes = stream::iter(Vec::<PositionFix>::new());
        let (handle, released) = released_flag();

        let result = refine_position(fixes, handle, RefineOptions::default()).await;
        assert!(matches!(result, Err(GeoError::NoFix)));
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn timeout_returns_best_so_far() {
        // one coarse fix, then the device goes quiet
        let fixes = stream::iter(vec![fix(200.0)]).chain(stream::pending());
        let (handle, released) = released_flag();

        let opts = RefineOptions {
            timeout: Duration::from_millis(50),
            ..RefineOptions::default()
        };
        let best = refine_position(Box::pin(fixes), handle, opts).await.unwrap();
        assert_eq!(best.accuracy_m, 200.0);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dropping_the_future_releases_the_watch() {
        let (handle, released) = released_flag();
        let fut = refine_position(
            Box::pin(stream::pending::<PositionFix>()),
            handle,
            RefineOptions::default(),
        );
        drop(fut);
        assert!(released.load(Ordering::SeqCst));
    }
}
