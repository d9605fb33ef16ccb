use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Visit every start and empty-element tag in document order.
fn for_each_element(xml: &str, mut visit: impl FnMut(&BytesStart<'_>)) {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().expect("well-formed xml") {
            Event::Start(e) | Event::Empty(e) => visit(&e),
            Event::Eof => break,
            _ => {}
        }
    }
}

/// Values of `attr` on every `element`, in document order.
pub fn attribute_values(xml: &str, element: &str, attr: &str) -> Vec<String> {
    let mut values = Vec::new();
    for_each_element(xml, |e| {
        if e.name().as_ref() != element.as_bytes() {
            return;
        }
        if let Some(value) = e.try_get_attribute(attr).expect("valid attributes") {
            values.push(
                value
                    .unescape_value()
                    .expect("valid attribute value")
                    .into_owned(),
            );
        }
    });
    values
}

/// Number of elements with the given tag name.
pub fn count_elements(xml: &str, tag: &str) -> usize {
    let mut count = 0;
    for_each_element(xml, |e| {
        if e.name().as_ref() == tag.as_bytes() {
            count += 1;
        }
    });
    count
}

/// Single `attr` of the only `element` in the document, parsed as seconds.
pub fn single_time(xml: &str, element: &str, attr: &str) -> f64 {
    let values = attribute_values(xml, element, attr);
    assert_eq!(values.len(), 1, "expected one <{element} {attr}>");
    values[0].parse().expect("numeric time")
}
