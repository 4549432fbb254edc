//! Writing a font table as GFX font source.
//!
//! The output is a C header containing three declarations: the packed bitmap
//! array (annotated with a picture of each glyph), the `GFXglyph` metrics
//! array and the `GFXfont` descriptor. Column widths are fixed, since the
//! result is frequently diffed and edited by hand.

use std::fmt::{self, Write};

use crate::{matrix::PixelMatrix, pack::Glyph, session::FontTable};

/// Extra vertical space between lines of text, added to the tallest glyph.
pub const LINE_GAP: usize = 10;
/// The character code of the first glyph.
pub const FIRST_CHAR: u32 = 0;

/// Write `table` as the source of a font called `font_name`.
pub fn write_font(table: &FontTable, font_name: &str, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "#include <gfxfont.h>")?;
    writeln!(out)?;
    write_bitmaps(table, font_name, out)?;
    writeln!(out)?;
    write_glyphs(table, font_name, out)?;
    write_descriptor(table, font_name, out)
}

/// Render `table` to a string.
pub fn font_source(table: &FontTable, font_name: &str) -> String {
    let mut out = String::new();
    // writing to a String can't fail
    let _ = write_font(table, font_name, &mut out);
    out
}

fn write_bitmaps(table: &FontTable, font_name: &str, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "const uint8_t {font_name}Bitmaps[] PROGMEM = {{")?;
    for (glyph, image) in table.parsed_glyphs().iter().zip(table.images()) {
        if !glyph.name.is_empty() {
            writeln!(out, "// {}", glyph.name)?;
        }
        write_glyph_picture(glyph, image, table.glyph_bitmap(glyph), out)?;
    }
    // the last glyph's bytes end with a comma, so close with a spare byte
    writeln!(out, "0x00}};")
}

fn write_glyph_picture(
    glyph: &Glyph,
    image: &PixelMatrix,
    bytes: &[u8],
    out: &mut impl Write,
) -> fmt::Result {
    write!(out, "/*| ")?;
    for _ in 0..glyph.width / 4 {
        write!(out, "8 4 2 1 ")?;
    }
    writeln!(out, "|*/")?;

    let row_len = glyph.width / 8;
    for (row_ix, row) in image.rows().enumerate() {
        write!(out, "/*| ")?;
        for (col, on) in row.iter().enumerate() {
            let cell = match *on {
                true => 'X',
                // mark byte boundaries inside the row
                false if (col + 1) % 8 == 0 && col + 1 != row.len() => ',',
                false => '.',
            };
            write!(out, "{cell} ")?;
        }
        write!(out, "|*/")?;
        for byte in &bytes[row_ix * row_len..(row_ix + 1) * row_len] {
            write!(out, " 0x{byte:02X},")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_glyphs(table: &FontTable, font_name: &str, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "const GFXglyph {font_name}Glyphs[] PROGMEM = {{")?;
    let glyphs = table.glyphs();
    let last = glyphs.len() - 1;
    for (i, glyph) in glyphs.iter().enumerate() {
        writeln!(
            out,
            "  {{ {:4}, {:2}, {:2}, {:2}, {:2}, {:3} }}{} // {}",
            glyph.index,
            glyph.width,
            glyph.height,
            glyph.x_advance,
            glyph.dx,
            glyph.dy,
            if i == last { "};" } else { "," },
            glyph.name,
        )?;
    }
    Ok(())
}

fn write_descriptor(table: &FontTable, font_name: &str, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "const GFXfont {font_name} PROGMEM = {{")?;
    writeln!(out, "  (uint8_t *){font_name}Bitmaps,")?;
    writeln!(out, "  (GFXglyph*){font_name}Glyphs,")?;
    writeln!(
        out,
        "  {FIRST_CHAR}, {}, {}}};",
        table.glyph_count() - 1,
        table.y_advance() + LINE_GAP
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{compile, CompileOptions};
    use pretty_assertions::assert_eq;

    fn compile_one(text: &str, factor: f32) -> FontTable {
        compile(text.lines(), &CompileOptions::with_factor(factor)).unwrap()
    }

    #[test]
    fn picture_rows() {
        let table = compile_one(
            "// A\n\
             /*| X . . . . . . X X . . . . . . . |*/\n\
             /*| . . . . . . . . . . . . . . . . |*/\n\
             }",
            1.0,
        );
        let glyph = &table.parsed_glyphs()[0];
        let mut out = String::new();
        write_glyph_picture(glyph, &table.images()[0], table.glyph_bitmap(glyph), &mut out)
            .unwrap();
        assert_eq!(
            out,
            "/*| 8 4 2 1 8 4 2 1 8 4 2 1 8 4 2 1 |*/\n\
             /*| X . . . . . . X X . . . . . . . |*/ 0x81, 0x80,\n\
             /*| . . . . . . . , . . . . . . . . |*/ 0x00, 0x00,\n"
        );
    }

    #[test]
    fn glyph_lines() {
        let table = compile_one(
            "// A\n\
             /*| X . . . . . . X |*/\n\
             /*| . . . . . . . . |*/\n\
             }",
            1.0,
        );
        let mut out = String::new();
        write_glyphs(&table, "Test", &mut out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 33);
        assert_eq!(lines[0], "const GFXglyph TestGlyphs[] PROGMEM = {");
        assert_eq!(lines[1], "  {    0,  8,  2, 11,  3,  -5 }, //  A");
        assert_eq!(lines[2], "  {    0,  8,  2, 11,  3,  -5 }, // 1");
        assert_eq!(lines[32], "  {    0,  8,  2, 11,  3,  -5 }}; // 31");
    }

    #[test]
    fn descriptor() {
        let table = compile_one("/*| X . . . . . . . |*/\n}", 2.0);
        let mut out = String::new();
        write_descriptor(&table, "Sym", &mut out).unwrap();
        assert_eq!(
            out,
            "const GFXfont Sym PROGMEM = {\n\
             \x20 (uint8_t *)SymBitmaps,\n\
             \x20 (GFXglyph*)SymGlyphs,\n\
             \x20 0, 31, 12};\n"
        );
    }

    #[test]
    fn unnamed_glyphs_have_no_heading() {
        let table = compile_one("/*| X . . . . . . . |*/\n}", 1.0);
        let source = font_source(&table, "F");
        assert!(!source.contains("\n// "));
        assert!(source.contains("  {    0,  8,  1,  4,  3,  -4 }, // \n"));
    }
}
