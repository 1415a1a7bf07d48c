//! Rewrites constructs that have no allow-listed markup into plain events,
//! so their text stays readable once the sanitizer strips the elements.
//!
//! Table rows become paragraphs with cells separated by a space. Images
//! become their alt text.

use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;

const CELL_SEPARATOR: &str = " ";

pub(crate) struct Flattener<I> {
    inner: I,
    cell_index: usize,
}

impl<I> Flattener<I> {
    pub(crate) fn new(inner: I) -> Self {
        Self {
            inner,
            cell_index: 0,
        }
    }
}

impl<'a, I> Iterator for Flattener<I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.inner.next()?;
            match event {
                Event::Start(Tag::Table(_) | Tag::Image { .. })
                | Event::End(TagEnd::Table | TagEnd::Image | TagEnd::TableCell) => continue,
                Event::Start(Tag::TableHead | Tag::TableRow) => {
                    self.cell_index = 0;
                    return Some(Event::Start(Tag::Paragraph));
                }
                Event::End(TagEnd::TableHead | TagEnd::TableRow) => {
                    return Some(Event::End(TagEnd::Paragraph));
                }
                Event::Start(Tag::TableCell) => {
                    self.cell_index += 1;
                    if self.cell_index > 1 {
                        return Some(Event::Text(CowStr::Borrowed(CELL_SEPARATOR)));
                    }
                }
                other => return Some(other),
            }
        }
    }
}
