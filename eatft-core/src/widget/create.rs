//! Creating and removing widgets
//!
//! Every operation here stages one command and flushes it. The widget
//! table is only changed once the command is staged, so a failure leaves
//! both the table and the outbound frame as they were.

use eatft_protocol::{Command, Label, Rect};

use super::{Widget, WidgetId, WidgetKind};
use crate::error::{Error, RegistryError};
use crate::session::{Callback, Session};
use crate::traits::Transport;

impl<T: Transport, U> Session<T, U> {
    /// Register a free touch area
    pub fn touch_area_create(
        &mut self,
        rect: Rect,
        callback: Callback<T, U>,
        payload: usize,
    ) -> Result<WidgetId, Error<T::Error>> {
        self.settle()?;
        let id = self
            .widgets
            .allocate(Widget::new(WidgetKind::TouchArea, rect, callback, payload))?;
        self.commit(id, &Command::TouchArea(rect))
    }

    /// Create a touch button, inset by the configured margins
    pub fn button_create(
        &mut self,
        rect: Rect,
        callback: Callback<T, U>,
        payload: usize,
        label: Label<'_>,
    ) -> Result<WidgetId, Error<T::Error>> {
        self.key_create(WidgetKind::Button, rect, callback, payload, label)
    }

    /// Create a touch switch, inset by the configured margins
    pub fn switch_create(
        &mut self,
        rect: Rect,
        callback: Callback<T, U>,
        payload: usize,
        label: Label<'_>,
    ) -> Result<WidgetId, Error<T::Error>> {
        self.key_create(WidgetKind::Switch, rect, callback, payload, label)
    }

    /// Create a button in the next row of the current window
    pub fn button_create_in_window(
        &mut self,
        callback: Callback<T, U>,
        payload: usize,
        label: Label<'_>,
    ) -> Result<WidgetId, Error<T::Error>> {
        self.create_in_window(WidgetKind::Button, callback, payload, label)
    }

    /// Create a switch in the next row of the current window
    pub fn switch_create_in_window(
        &mut self,
        callback: Callback<T, U>,
        payload: usize,
        label: Label<'_>,
    ) -> Result<WidgetId, Error<T::Error>> {
        self.create_in_window(WidgetKind::Switch, callback, payload, label)
    }

    /// Change a switch without touching it
    pub fn switch_set(&mut self, id: WidgetId, on: bool) -> Result<(), Error<T::Error>> {
        self.settle()?;
        match self.widgets.get(id) {
            Some(w) if w.kind == WidgetKind::Switch => {}
            Some(_) => return Err(RegistryError::WrongKind.into()),
            None => return Err(RegistryError::NotRegistered.into()),
        }

        self.send(&Command::SwitchSet {
            code: id.code(),
            on,
        })?;
        if let Some(w) = self.widgets.get_mut(id) {
            w.enabled = on;
        }
        self.flush()
    }

    /// Remove a widget from the display and free its slot
    ///
    /// Buttons and switches are removed by code, touch areas by the
    /// coordinate of their center.
    pub fn widget_free(&mut self, id: WidgetId) -> Result<(), Error<T::Error>> {
        self.settle()?;
        let widget = *self
            .widgets
            .get(id)
            .ok_or(RegistryError::NotRegistered)?;

        let remove = match widget.kind {
            WidgetKind::TouchArea => Command::TouchAreaRemove(widget.rect),
            WidgetKind::Button | WidgetKind::Switch => Command::ButtonRemove(id.code()),
        };
        self.send(&remove)?;
        self.widgets.release(id)?;
        self.flush()
    }

    /// Set the area that `*_in_window` widgets are stacked into
    pub fn window_set(&mut self, window: Rect) {
        self.window = Some(window);
    }

    /// Forget the window; the next `*_in_window` widget starts at the top
    /// of the screen
    pub fn window_clear(&mut self) {
        self.window = None;
    }

    pub fn window(&self) -> Option<Rect> {
        self.window
    }

    fn key_create(
        &mut self,
        kind: WidgetKind,
        rect: Rect,
        callback: Callback<T, U>,
        payload: usize,
        label: Label<'_>,
    ) -> Result<WidgetId, Error<T::Error>> {
        self.settle()?;
        let id = self
            .widgets
            .allocate(Widget::new(kind, rect, callback, payload))?;

        let area = self.config.inset(rect);
        let (down_code, up_code) = (id.down_code(), id.code());
        let command = match kind {
            WidgetKind::Switch => Command::SwitchCreate {
                area,
                down_code,
                up_code,
                label,
            },
            _ => Command::ButtonCreate {
                area,
                down_code,
                up_code,
                label,
            },
        };
        self.commit(id, &command)
    }

    fn create_in_window(
        &mut self,
        kind: WidgetKind,
        callback: Callback<T, U>,
        payload: usize,
        label: Label<'_>,
    ) -> Result<WidgetId, Error<T::Error>> {
        let mut window = self.window.unwrap_or_else(|| self.config.screen());
        window.y = window.y.saturating_add(self.config.margin_y);

        let rect = Rect::new(window.x, window.y, window.width, self.config.button_height);
        let id = self.key_create(kind, rect, callback, payload, label)?;

        window.y = window.y.saturating_add(self.config.button_height);
        self.window = Some(window);
        Ok(id)
    }

    /// Stage the create command for a freshly allocated slot
    fn commit(&mut self, id: WidgetId, command: &Command<'_>) -> Result<WidgetId, Error<T::Error>> {
        if let Err(e) = self.send(command) {
            // `id` was allocated by the caller, so the slot is occupied
            let released = self.widgets.release(id);
            debug_assert!(released.is_ok());
            return Err(e);
        }
        self.flush()?;
        Ok(id)
    }
}
