//! Title, geometry and appearance.

use deskgui_common::{Color, Result, ViewRect, ViewSize};

use super::native::SCREEN_SIZE;
use super::Window;

impl Window {
    pub fn set_title(&self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.set_title(title));
        }
        self.native()?.title = title;
        Ok(())
    }

    pub fn title(&self) -> Result<String> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.title());
        }
        Ok(self.native()?.title.clone())
    }

    /// Resize, clamped to the min/max hints. Returns the applied size.
    pub fn set_size(&self, size: ViewSize) -> Result<ViewSize> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.set_size(size));
        }
        Ok(self.native()?.apply_size(size))
    }

    pub fn size(&self) -> Result<ViewSize> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.size());
        }
        Ok(self.native()?.size)
    }

    /// Lower bound on the window size. The current size is re-clamped.
    pub fn set_min_size(&self, size: ViewSize) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.set_min_size(size));
        }
        let mut native = self.native()?;
        native.min_size = Some(size);
        let current = native.size;
        native.apply_size(current);
        Ok(())
    }

    pub fn min_size(&self) -> Result<Option<ViewSize>> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.min_size());
        }
        Ok(self.native()?.min_size)
    }

    pub fn max_size(&self) -> Result<Option<ViewSize>> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.max_size());
        }
        Ok(self.native()?.max_size)
    }

    pub fn set_max_size(&self, size: ViewSize) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.set_max_size(size));
        }
        let mut native = self.native()?;
        native.max_size = Some(size);
        let current = native.size;
        native.apply_size(current);
        Ok(())
    }

    /// Move and resize to `rect`. The size part is clamped like
    /// [`Window::set_size`].
    pub fn set_position(&self, rect: ViewRect) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.set_position(rect));
        }
        let mut native = self.native()?;
        native.left = rect.left;
        native.top = rect.top;
        native.apply_size(rect.size());
        Ok(())
    }

    pub fn position(&self) -> Result<ViewRect> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.position());
        }
        let native = self.native()?;
        Ok(ViewRect::new(0, 0, native.size.width, native.size.height)
            .moved_to(native.left, native.top))
    }

    /// Center the window on the screen.
    pub fn center(&self) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.center());
        }
        let mut native = self.native()?;
        native.left = SCREEN_SIZE.width.saturating_sub(native.size.width) / 2;
        native.top = SCREEN_SIZE.height.saturating_sub(native.size.height) / 2;
        Ok(())
    }

    pub fn set_resizable(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.set_resizable(state));
        }
        self.native()?.resizable = state;
        Ok(())
    }

    pub fn is_resizable(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.is_resizable());
        }
        Ok(self.native()?.resizable)
    }

    pub fn set_decorations(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.set_decorations(state));
        }
        self.native()?.decorations = state;
        Ok(())
    }

    pub fn is_decorated(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.is_decorated());
        }
        Ok(self.native()?.decorations)
    }

    pub fn show(&self) -> Result<()> {
        self.notify_shown(true)
    }

    pub fn hide(&self) -> Result<()> {
        self.notify_shown(false)
    }

    pub fn is_visible(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.is_visible());
        }
        Ok(self.native()?.visible)
    }

    /// Enable or disable user input to the window.
    pub fn enable(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.enable(state));
        }
        self.native()?.enabled = state;
        Ok(())
    }

    pub fn is_enabled(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.is_enabled());
        }
        Ok(self.native()?.enabled)
    }

    pub fn set_background_color(&self, color: Color) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.set_background_color(color));
        }
        self.native()?.background = Some(color);
        Ok(())
    }

    pub fn background_color(&self) -> Result<Option<Color>> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.background_color());
        }
        Ok(self.native()?.background)
    }

    pub fn display_scale_factor(&self) -> Result<f64> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.display_scale_factor());
        }
        Ok(self.native()?.scale_factor)
    }
}
