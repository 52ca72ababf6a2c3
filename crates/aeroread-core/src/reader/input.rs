impl<C, B, IN> ReaderSession<C, B, IN>
where
    C: ChapterSource,
    B: BookmarkStore,
    B::Error: fmt::Debug,
    IN: InputProvider,
    IN::Error: fmt::Debug,
{
    fn process_inputs(&mut self, now_ms: u64) -> bool {
        let mut handled = false;
        loop {
            match self.input.poll_event() {
                Ok(Some(command)) => {
                    self.apply_command(command, now_ms);
                    handled = true;
                }
                Ok(None) => break,
                Err(err) => {
                    warn!("reader: input provider failed: {:?}", err);
                    break;
                }
            }
        }
        handled
    }

    pub fn apply_command(&mut self, command: KeyCommand, now_ms: u64) {
        debug!("reader: command {:?}", command);

        match command {
            KeyCommand::TogglePlay => self.toggle_play(now_ms),
            KeyCommand::Rewind => self.engine.rewind(self.config.rewind_words),
            KeyCommand::Faster => self.adjust_rate(true),
            KeyCommand::Slower => self.adjust_rate(false),
            KeyCommand::SetGroup(group_size) => {
                self.config.group_size = group_size;
                self.engine.set_group_size(group_size);
            }
            KeyCommand::ToggleWarmup => {
                if let Some(event) = self.ramp.toggle(now_ms, self.engine.is_playing()) {
                    self.on_ramp_event(event);
                }
            }
            KeyCommand::SaveBookmark => self.save_bookmark(now_ms),
            KeyCommand::RestoreBookmark => self.restore_bookmark(now_ms),
            KeyCommand::DismissNotice => self.notices.dismiss(),
            KeyCommand::Reset => {
                self.engine.reset();
                self.stop_ramp();
                self.retry_chapter = false;
                self.book_complete = false;
            }
            KeyCommand::Exit => self.close(now_ms),
        }

        self.pending_redraw = true;
    }

    fn toggle_play(&mut self, now_ms: u64) {
        if self.engine.is_playing() {
            self.engine.pause();
            self.stop_ramp();
            return;
        }

        if self.retry_chapter {
            self.open_next_chapter(now_ms);
            return;
        }

        self.engine.play();
        if self.engine.is_playing() {
            self.book_complete = false;
            self.begin_history(now_ms);
        }
    }

    fn adjust_rate(&mut self, increase: bool) {
        if !self.config.adjust_wpm(increase) {
            return;
        }

        // An active ramp keeps its ceiling; the new rate lands when it ends.
        if !self.ramp.is_active() {
            self.rate.set(self.config.wpm);
        }
        self.ramp.track_target(self.config.wpm);
        debug!("reader: wpm={}", self.config.wpm);
    }

    fn save_bookmark(&mut self, now_ms: u64) {
        let bookmark = Bookmark {
            fingerprint: self.fingerprint.clone(),
            chapter: self.chapters.current_index(),
            index: self.engine.position(),
            saved_at_ms: now_ms,
        };

        match self.bookmarks.save(bookmark.clone()) {
            Ok(()) => {
                info!(
                    "reader: bookmark saved chapter={} word={}",
                    bookmark.chapter, bookmark.index
                );
                self.saved_bookmark = Some(bookmark);
            }
            Err(err) => warn!("reader: bookmark save failed: {:?}", err),
        }
    }

    fn restore_bookmark(&mut self, now_ms: u64) {
        let bookmark = match self.bookmarks.load(&self.fingerprint) {
            Ok(Some(bookmark)) => bookmark,
            Ok(None) => {
                debug!("reader: no bookmark for {}", self.fingerprint);
                return;
            }
            Err(err) => {
                warn!("reader: bookmark load failed: {:?}", err);
                return;
            }
        };

        if bookmark.chapter == self.chapters.current_index() {
            self.engine.seek(bookmark.index);
        } else {
            match self.chapters.open_at(bookmark.chapter) {
                Ok(Some(chapter)) => {
                    let resume = self.engine.is_playing();
                    self.swap_chapter(chapter, bookmark.index, resume, now_ms);
                }
                Ok(None) => {
                    warn!("reader: bookmark chapter {} is missing", bookmark.chapter);
                    return;
                }
                Err(err) => {
                    warn!("reader: bookmark chapter failed to load: {}", err);
                    return;
                }
            }
        }

        self.retry_chapter = false;
        self.book_complete = false;
        info!(
            "reader: bookmark restored chapter={} word={}",
            bookmark.chapter,
            self.engine.position()
        );
    }

    fn close(&mut self, now_ms: u64) {
        self.engine.pause();
        self.stop_ramp();
        self.history.end(now_ms);
        self.exit_requested = true;
        info!("reader: closed at word {}", self.engine.position());
    }
}
