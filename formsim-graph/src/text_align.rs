use cairo::{Context, Error};

/// A trait to add the `show_text_align` to the [`Context`] type.
pub trait ShowTextAlign {
    /// Shows the given text at the given `(x, y)` position, with the given alignment.
    ///
    /// The alignment point is a pair of `(x, y)` values, each between `0.0` and `1.0`. `(0.0,
    /// 0.0)` aligns the bottom left corner of the text to the given point (cairo's default),
    /// `(0.5, 0.5)` centers the text on it, and `(1.0, 1.0)` aligns the top right corner.
    fn show_text_align(
        &self,
        text: &str,
        point: (f64, f64),
        align: (f64, f64),
    ) -> Result<(), Error>;
}

impl ShowTextAlign for Context {
    fn show_text_align(
        &self,
        text: &str,
        (x, y): (f64, f64),
        align: (f64, f64),
    ) -> Result<(), Error> {
        let extents = self.text_extents(text)?;
        let x = x - extents.x_bearing() - extents.width() * align.0;
        let y = y + extents.height() * align.1;
        self.move_to(x, y);
        self.show_text(text)?;
        Ok(())
    }
}
