impl<C, B, IN> ReaderSession<C, B, IN>
where
    C: ChapterSource,
    B: BookmarkStore,
    B::Error: fmt::Debug,
    IN: InputProvider,
    IN::Error: fmt::Debug,
{
    /// Ramp, then engine, then collaborators. Returns whether anything
    /// visible changed.
    fn run_frame(&mut self, now_ms: u64) -> bool {
        let mut changed = false;

        if let Some(event) = self.ramp.on_frame(now_ms, self.engine.is_playing()) {
            changed |= self.on_ramp_event(event);
        }

        match self.engine.tick(now_ms) {
            EngineTick::Advanced => changed = true,
            EngineTick::Finished(completion) => {
                debug!("reader: sequence finished {:?}", completion);
                changed = true;
            }
            EngineTick::Waiting | EngineTick::Ignored => {}
        }

        if self.chapter_ended.take() {
            self.open_next_chapter(now_ms);
        }
        if self.book_ended.take() {
            self.finish_book(now_ms);
        }

        let wpm = self.rate.get();
        let progress = self.engine.progress();
        self.history.update(progress, wpm);

        let shown = self.notices.current();
        self.notices
            .observe(wpm, progress, self.engine.is_playing(), now_ms);

        changed || shown != self.notices.current()
    }

    fn on_ramp_event(&mut self, event: RampEvent) -> bool {
        match event {
            RampEvent::Emitted(_) => {}
            RampEvent::Completed(_) | RampEvent::Cancelled(_) => self.sync_rate(),
        }
        true
    }

    fn stop_ramp(&mut self) {
        if let Some(event) = self.ramp.stop() {
            self.on_ramp_event(event);
        }
    }

    /// Put the configured rate back in the live cell once the ramp lets go.
    fn sync_rate(&mut self) {
        self.rate.set(self.config.wpm);
        self.ramp.track_target(self.config.wpm);
    }

    fn arm_chapter_handler(&mut self) {
        if self.chapters.has_next() {
            let flag = self.chapter_ended.clone();
            self.engine.set_on_chapter_complete(move || flag.set(true));
        } else {
            self.engine.clear_on_chapter_complete();
        }
    }

    fn open_next_chapter(&mut self, now_ms: u64) {
        match self.chapters.advance() {
            Ok(Some(chapter)) => {
                self.retry_chapter = false;
                self.swap_chapter(chapter, 0, true, now_ms);
            }
            Ok(None) => {
                self.retry_chapter = false;
                self.finish_book(now_ms);
            }
            Err(err) => {
                // The engine stays finished on the last word; play retries.
                warn!("reader: next chapter unavailable: {}", err);
                self.retry_chapter = true;
            }
        }
        self.pending_redraw = true;
    }

    fn swap_chapter(&mut self, chapter: Chapter, start_index: usize, resume: bool, now_ms: u64) {
        self.history.end(now_ms);

        info!(
            "reader: chapter {}/{} words={}",
            chapter.index + 1,
            self.chapters.chapter_count(),
            chapter.words.len()
        );
        self.engine.load_words(chapter.words, start_index);
        self.arm_chapter_handler();

        if resume {
            self.engine.play();
            self.begin_history(now_ms);
        }
    }

    fn begin_history(&mut self, now_ms: u64) {
        if self.history.current().is_some() {
            return;
        }
        let text = reconstruct(self.engine.words());
        self.history
            .start(&text, self.engine.len(), self.rate.get(), now_ms);
    }

    fn finish_book(&mut self, now_ms: u64) {
        self.book_complete = true;
        self.history.update(100.0, self.rate.get());
        self.history.end(now_ms);
        self.notices.raise(NoticeId::Complete);
        info!(
            "reader: book complete at chapter {}",
            self.chapters.current_index() + 1
        );
    }
}
