impl<C, B, IN> ReaderSession<C, B, IN>
where
    C: ChapterSource,
    B: BookmarkStore,
    B::Error: fmt::Debug,
    IN: InputProvider,
    IN::Error: fmt::Debug,
{
    /// Open `source` at `start_chapter`.
    ///
    /// The bookmark fingerprint is taken from the first chapter, so it
    /// identifies the book regardless of where reading starts.
    pub fn new(
        mut source: C,
        start_chapter: usize,
        bookmarks: B,
        input: IN,
        config: ReaderConfig,
    ) -> Result<Self, SessionError> {
        let config = config.validate()?;
        let fingerprint = source
            .load_chapter(0)?
            .map(|text| text_fingerprint(&text))
            .unwrap_or_default();

        let mut chapters = ChapterStream::new(source, start_chapter);
        let mut words = chapters.open()?.map(|chapter| chapter.words).unwrap_or_default();

        // A blank opening chapter would leave nothing to play; move on to the
        // first chapter with words, or let play retry if that load fails.
        let mut retry_chapter = false;
        if words.is_empty() && chapters.has_next() {
            match chapters.advance() {
                Ok(Some(chapter)) => words = chapter.words,
                Ok(None) => {}
                Err(_) => retry_chapter = true,
            }
        }

        let rate = LiveRate::new(config.wpm);
        let mut engine = PlaybackEngine::new(words, 0, rate.clone());
        engine.set_group_size(config.group_size);

        let book_ended = Rc::new(Cell::new(false));
        let flag = book_ended.clone();
        engine.set_on_complete(move || flag.set(true));

        info!(
            "reader: opened chapter {}/{} words={} wpm={} fingerprint={}",
            chapters.current_index() + 1,
            chapters.chapter_count(),
            engine.len(),
            config.wpm,
            fingerprint
        );

        let mut session = Self {
            ramp: RateRamp::new(rate.clone(), config.wpm),
            config,
            rate,
            engine,
            chapters,
            bookmarks,
            input,
            fingerprint,
            saved_bookmark: None,
            history: ReadingHistory::new(),
            notices: Notices::new(),
            chapter_ended: Rc::new(Cell::new(false)),
            book_ended,
            retry_chapter,
            book_complete: false,
            exit_requested: false,
            pending_redraw: true,
        };
        session.arm_chapter_handler();
        Ok(session)
    }

    pub fn tick(&mut self, now_ms: u64) -> FrameResult {
        let handled_input = self.process_inputs(now_ms);
        let frame_changed = self.run_frame(now_ms);

        if handled_input || frame_changed || self.pending_redraw {
            self.pending_redraw = false;
            FrameResult::RenderRequested
        } else {
            FrameResult::NoRender
        }
    }

    pub fn view(&self) -> ReaderView<'_> {
        let display = match self.engine.current_chunk() {
            None => WordDisplay::Empty,
            Some(chunk) if chunk.is_grouped() => WordDisplay::Group(chunk.display_text()),
            Some(_) => self
                .engine
                .current_word()
                .map_or(WordDisplay::Empty, |word| WordDisplay::Word(WordParts::from(word))),
        };
        let remaining = self.engine.len().saturating_sub(self.engine.position());

        ReaderView {
            display,
            live_wpm: self.rate.get(),
            target_wpm: self.config.wpm,
            position: self.engine.position(),
            total_words: self.engine.len(),
            progress: self.engine.progress(),
            seconds_left: pacing::estimated_time_left(remaining, self.config.wpm),
            phase: self.engine.phase(),
            group_size: self.engine.group_size(),
            warmup_active: self.ramp.is_active(),
            chapter: self.chapters.current_index(),
            chapter_count: self.chapters.chapter_count(),
            notice: self.notices.current().map(NoticeId::message),
        }
    }

    pub fn persisted_settings(&self) -> PersistedSettings {
        PersistedSettings::new(self.config.wpm, self.config.group_size)
            .with_bookmark(self.saved_bookmark.clone())
    }

    pub fn apply_persisted_settings(&mut self, settings: PersistedSettings) {
        settings.apply_to(&mut self.config);
        if !self.ramp.is_active() {
            self.rate.set(self.config.wpm);
        }
        self.ramp.track_target(self.config.wpm);
        self.engine.set_group_size(self.config.group_size);
        self.saved_bookmark = settings.bookmark;
        self.pending_redraw = true;
        debug!(
            "reader: settings applied wpm={} group={}",
            self.config.wpm,
            self.config.group_size.get()
        );
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn ramp(&self) -> &RateRamp {
        &self.ramp
    }

    pub fn live_rate(&self) -> u16 {
        self.rate.get()
    }

    pub fn history(&self) -> &ReadingHistory {
        &self.history
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn bookmarks(&self) -> &B {
        &self.bookmarks
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }

    pub fn chapter_index(&self) -> usize {
        self.chapters.current_index()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn is_book_complete(&self) -> bool {
        self.book_complete
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
