//! Client-side state controller.
//!
//! Owns the results of the three backend calls and the current view. Every
//! call runs under its own cancellation token; starting a call cancels the
//! previous one of the same kind, and a cancelled call never writes state.
//! Lyrics and analysis calls made for an open song hang off that song's
//! selection token, so leaving the song also stops calls not yet started.

use super::api::{ClientError, LensBackend};
use super::state::OperationState;
use super::view::ViewState;
use crate::song::{LyricsAnalysis, Song};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Everything a view needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LensState {
    pub view: ViewState,
    pub search: OperationState<Vec<Song>>,
    pub lyrics: OperationState<Option<String>>,
    pub analysis: OperationState<LyricsAnalysis>,
}

impl LensState {
    /// Results of the last completed search, empty otherwise.
    pub fn songs(&self) -> &[Song] {
        self.search.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lyrics(&self) -> Option<&str> {
        self.lyrics.value().and_then(|l| l.as_deref())
    }

    pub fn lyrics_analysis(&self) -> Option<&LyricsAnalysis> {
        self.analysis.value()
    }

    pub fn is_loading(&self) -> bool {
        self.search.is_loading() || self.lyrics.is_loading() || self.analysis.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.analysis
            .error()
            .or_else(|| self.lyrics.error())
            .or_else(|| self.search.error())
    }

    fn clear_errors(&mut self) {
        self.search.clear_error();
        self.lyrics.clear_error();
        self.analysis.clear_error();
    }
}

#[derive(Debug, Clone, Copy)]
enum OperationKind {
    Search,
    Lyrics,
    Analysis,
}

#[derive(Default)]
struct InFlight {
    selection: Option<CancellationToken>,
    search: Option<CancellationToken>,
    lyrics: Option<CancellationToken>,
    analysis: Option<CancellationToken>,
}

impl InFlight {
    fn slot(&mut self, kind: OperationKind) -> &mut Option<CancellationToken> {
        match kind {
            OperationKind::Search => &mut self.search,
            OperationKind::Lyrics => &mut self.lyrics,
            OperationKind::Analysis => &mut self.analysis,
        }
    }

    fn cancel(&mut self, kind: OperationKind) {
        if let Some(token) = self.slot(kind).take() {
            token.cancel();
        }
    }

    /// Drops the open song along with every call made for it.
    fn cancel_selection(&mut self) {
        if let Some(token) = self.selection.take() {
            token.cancel();
        }
        self.cancel(OperationKind::Lyrics);
        self.cancel(OperationKind::Analysis);
    }
}

#[derive(Default)]
struct Inner {
    state: LensState,
    in_flight: InFlight,
}

fn settled<T: Clone>(result: &Result<T, ClientError>) -> OperationState<T> {
    match result {
        Ok(value) => OperationState::Success(value.clone()),
        Err(e) => OperationState::Error(e.to_string()),
    }
}

pub struct LensController {
    backend: Arc<dyn LensBackend>,
    inner: Mutex<Inner>,
    root: CancellationToken,
}

impl LensController {
    pub fn new(backend: Arc<dyn LensBackend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(Inner::default()),
            root: CancellationToken::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `kind` as loading and returns the token for the new call,
    /// cancelling whatever call of that kind was still running.
    ///
    /// The token is a child of `parent`. If `parent` is already cancelled the
    /// returned token is too and state is left alone.
    fn begin(&self, kind: OperationKind, parent: &CancellationToken) -> CancellationToken {
        let token = parent.child_token();
        let mut inner = self.lock();
        if token.is_cancelled() {
            return token;
        }
        if let Some(previous) = inner.in_flight.slot(kind).replace(token.clone()) {
            debug!("Superseding in-flight {:?} call", kind);
            previous.cancel();
        }
        inner.state.clear_errors();
        match kind {
            OperationKind::Search => inner.state.search = OperationState::Loading,
            OperationKind::Lyrics => inner.state.lyrics = OperationState::Loading,
            OperationKind::Analysis => inner.state.analysis = OperationState::Loading,
        }
        token
    }

    async fn run<T>(
        token: &CancellationToken,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ClientError::Cancelled),
            result = call => result,
        }
    }

    /// Stores the outcome unless the call was cancelled meanwhile.
    fn settle<T>(
        &self,
        token: &CancellationToken,
        result: Result<T, ClientError>,
        store: impl FnOnce(&mut LensState, &Result<T, ClientError>),
    ) -> Result<T, ClientError> {
        let mut inner = self.lock();
        if token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        store(&mut inner.state, &result);
        result
    }

    pub async fn search_songs(&self, query: &str) -> Result<Vec<Song>, ClientError> {
        let token = self.begin(OperationKind::Search, &self.root);
        let result = Self::run(&token, self.backend.search_songs(query))
            .await
            .map(|items| items.into_iter().map(Song::from).collect::<Vec<_>>());
        self.settle(&token, result, |state, result| {
            state.search = settled(result)
        })
    }

    pub async fn get_lyrics(&self, song: &Song) -> Result<Option<String>, ClientError> {
        self.fetch_lyrics(song, &self.root).await
    }

    async fn fetch_lyrics(
        &self,
        song: &Song,
        parent: &CancellationToken,
    ) -> Result<Option<String>, ClientError> {
        let token = self.begin(OperationKind::Lyrics, parent);
        let call = self.backend.get_lyrics(&song.artist, &song.title);
        let result = Self::run(&token, call).await;
        self.settle(&token, result, |state, result| {
            state.lyrics = settled(result)
        })
    }

    pub async fn analyze_lyrics(
        &self,
        song: &Song,
        lyrics: &str,
    ) -> Result<LyricsAnalysis, ClientError> {
        self.fetch_analysis(song, lyrics, &self.root).await
    }

    async fn fetch_analysis(
        &self,
        song: &Song,
        lyrics: &str,
        parent: &CancellationToken,
    ) -> Result<LyricsAnalysis, ClientError> {
        let token = self.begin(OperationKind::Analysis, parent);
        let call = self
            .backend
            .analyze_lyrics(&song.title, &song.artist, lyrics);
        let result = Self::run(&token, call).await;
        self.settle(&token, result, |state, result| {
            state.analysis = settled(result)
        })
    }

    /// Opens `song` and loads its lyrics, then its analysis once lyrics
    /// are available.
    ///
    /// Lyrics that are present but blank are treated like missing ones and
    /// skip the analysis call, since the backend rejects empty lyrics.
    pub async fn select_song(&self, song: Song) {
        let selection = self.root.child_token();
        {
            let mut inner = self.lock();
            inner.in_flight.cancel_selection();
            inner.in_flight.selection = Some(selection.clone());
            inner.state.lyrics = OperationState::Idle;
            inner.state.analysis = OperationState::Idle;
            inner.state.view = ViewState::ViewingSong(song.clone());
        }

        match self.fetch_lyrics(&song, &selection).await {
            Ok(Some(lyrics)) if !lyrics.trim().is_empty() => {
                if let Err(e) = self.fetch_analysis(&song, &lyrics, &selection).await {
                    debug!("Analysis of {:?} failed: {}", song.id, e);
                }
            }
            Ok(_) => debug!("No lyrics for {:?}, skipping analysis", song.id),
            Err(e) => debug!("Lyrics for {:?} failed: {}", song.id, e),
        }
    }

    /// Returns to the song grid, dropping the open song's calls and results.
    pub fn back(&self) {
        let mut inner = self.lock();
        inner.in_flight.cancel_selection();
        inner.state.lyrics = OperationState::Idle;
        inner.state.analysis = OperationState::Idle;
        inner.state.view = ViewState::Browsing;
    }

    pub fn snapshot(&self) -> LensState {
        self.lock().state.clone()
    }

    pub fn view(&self) -> ViewState {
        self.lock().state.view.clone()
    }

    pub fn songs(&self) -> Vec<Song> {
        self.lock().state.songs().to_vec()
    }

    pub fn lyrics(&self) -> Option<String> {
        self.lock().state.lyrics().map(str::to_string)
    }

    pub fn lyrics_analysis(&self) -> Option<LyricsAnalysis> {
        self.lock().state.lyrics_analysis().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error().map(str::to_string)
    }
}

impl Drop for LensController {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
