//! バックグラウンド描画ワーカー
//!
//! 描画要求ごとに世代番号を振り、常に最新の要求だけを描く。
//! 古い世代の要求は、待ち行列にあればスキップし、描画中なら次の行の
//! 区切りで中断する。どちらも `RenderError::Cancelled` として通知する。

use std::cell::Cell;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use image::RgbImage;
use log::{debug, error, info};

use super::colors::Coloring;
use super::error::RenderError;
use super::render::{render_with_progress, Progress, RenderRequest};

/// スレッド間で共有する色付け方式
pub type SharedColoring = Arc<dyn Coloring + Send + Sync>;

/// ワーカーからの通知
#[derive(Debug)]
pub enum WorkerEvent {
    Progress {
        generation: u64,
        progress: Progress,
    },
    /// 要求1件につき必ず1回届く
    Finished {
        generation: u64,
        result: Result<RgbImage, RenderError>,
    },
}

struct Job {
    generation: u64,
    request: RenderRequest,
    coloring: SharedColoring,
}

pub struct RenderWorker {
    jobs: Option<Sender<Job>>,
    events: Receiver<WorkerEvent>,
    current: Arc<AtomicU64>,
    /// 最後に submit した世代
    last_submitted: Cell<u64>,
    /// 受信側で最後に受け取った Finished の世代
    last_finished: Cell<u64>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn() -> std::io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let current = Arc::new(AtomicU64::new(0));

        let shared = Arc::clone(&current);
        let handle = thread::Builder::new()
            .name("render-worker".into())
            .spawn(move || run(job_rx, event_tx, shared))?;

        Ok(Self {
            jobs: Some(job_tx),
            events: event_rx,
            current,
            last_submitted: Cell::new(0),
            last_finished: Cell::new(0),
            handle: Some(handle),
        })
    }

    /// 描画要求を投入し、その世代番号を返す
    ///
    /// 不正な要求は投入前にエラーになる。投入すると、それより前の要求は
    /// すべてキャンセル扱いになる。
    pub fn submit(
        &self,
        request: RenderRequest,
        coloring: SharedColoring,
    ) -> Result<u64, RenderError> {
        request.validate()?;
        let jobs = self.jobs.as_ref().ok_or(RenderError::WorkerGone)?;

        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("描画要求 世代 {}", generation);
        jobs.send(Job {
            generation,
            request,
            coloring,
        })
        .map_err(|_| RenderError::WorkerGone)?;
        self.last_submitted.set(generation);
        Ok(generation)
    }

    /// 描画中・待機中の要求をすべてキャンセル
    pub fn cancel(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_generation(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// 次の通知を待つ
    pub fn recv(&self) -> Result<WorkerEvent, RenderError> {
        let event = self.events.recv().map_err(|_| RenderError::WorkerGone)?;
        if let WorkerEvent::Finished { generation, .. } = event {
            self.last_finished.set(generation);
        }
        Ok(event)
    }

    /// 指定した世代の結果が届くまで待つ（途中の通知は読み捨てる）
    ///
    /// submit で返されていない世代や、結果をすでに `recv` で受け取った世代は
    /// `RenderError::UnknownGeneration` になる。
    pub fn wait_for(&self, generation: u64) -> Result<RgbImage, RenderError> {
        // Finished は世代順に届く
        if generation == 0
            || generation > self.last_submitted.get()
            || generation <= self.last_finished.get()
        {
            return Err(RenderError::UnknownGeneration(generation));
        }
        loop {
            if let WorkerEvent::Finished {
                generation: finished,
                result,
            } = self.recv()?
            {
                if finished == generation {
                    return result;
                }
                if finished > generation {
                    return Err(RenderError::UnknownGeneration(generation));
                }
            }
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.cancel();
        drop(self.jobs.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("描画ワーカーが異常終了しました");
            }
        }
    }
}

fn run(jobs: Receiver<Job>, events: Sender<WorkerEvent>, current: Arc<AtomicU64>) {
    for Job {
        generation,
        request,
        coloring,
    } in jobs
    {
        let result = if current.load(Ordering::SeqCst) != generation {
            debug!("世代 {} は新しい要求があるためスキップ", generation);
            Err(RenderError::Cancelled)
        } else {
            let start = Instant::now();
            let result = render_with_progress(&request, coloring.as_ref(), |progress| {
                if current.load(Ordering::SeqCst) != generation {
                    return ControlFlow::Break(());
                }
                // 受信側がいなくなっても描画自体は続ける
                let _ = events.send(WorkerEvent::Progress {
                    generation,
                    progress,
                });
                ControlFlow::Continue(())
            });
            match &result {
                Ok(_) => info!("世代 {} 描画完了: {:.2?}", generation, start.elapsed()),
                Err(e) => debug!("世代 {}: {}", generation, e),
            }
            result
        };

        if events.send(WorkerEvent::Finished { generation, result }).is_err() {
            break;
        }
    }
    debug!("描画ワーカー終了");
}
