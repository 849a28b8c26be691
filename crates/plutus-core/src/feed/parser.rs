use super::models::ArticleRecord;
use super::tree::{parse_document, XmlNode};
use crate::{Error, Result};

/// Parse RSS 2.0 content into article records, in document order
pub fn parse_feed(content: &[u8]) -> Result<Vec<ArticleRecord>> {
    let xml = std::str::from_utf8(content)
        .map_err(|e| Error::Parse(format!("Feed is not valid UTF-8: {}", e)))?;
    let document = parse_document(xml)?;
    project_items(&document)
}

/// Project `rss.channel[0].item` of a parsed document into records.
///
/// A single malformed item fails the whole projection.
pub fn project_items(document: &XmlNode) -> Result<Vec<ArticleRecord>> {
    let rss = document
        .first("rss")
        .ok_or_else(|| Error::Parse("Feed has no <rss> root element".to_string()))?;
    let channel = rss
        .first("channel")
        .ok_or_else(|| Error::Parse("Feed has no <channel> element".to_string()))?;

    let items = channel.children("item");
    if items.is_empty() {
        return Err(Error::Parse("Feed channel has no <item> elements".to_string()));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| project_item(index, item))
        .collect()
}

fn project_item(index: usize, item: &XmlNode) -> Result<ArticleRecord> {
    let source = first_child(index, item, "source")?;
    let source_url = source
        .attribute("url")
        .ok_or_else(|| Error::Parse(format!("Item {} <source> has no url attribute", index)))?;

    Ok(ArticleRecord {
        title: first_child(index, item, "title")?.text.clone(),
        link: first_child(index, item, "link")?.text.clone(),
        description: first_child(index, item, "description")?.text.clone(),
        source_name: source.text.clone(),
        source_url: source_url.to_string(),
        published_date: first_child(index, item, "pubDate")?.text.clone(),
    })
}

fn first_child<'a>(index: usize, item: &'a XmlNode, tag: &str) -> Result<&'a XmlNode> {
    item.first(tag)
        .ok_or_else(|| Error::Parse(format!("Item {} is missing <{}>", index, tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_ITEM: &str = r#"
        <rss>
            <channel>
                <item>
                    <title>Example Title</title>
                    <link>http://example.com</link>
                    <description>This is an example description.</description>
                    <source url="http://source.com">Example Source</source>
                    <pubDate>Wed, 01 Jan 2020 00:00:00 GMT</pubDate>
                </item>
            </channel>
        </rss>
    "#;

    fn item(n: usize) -> String {
        format!(
            "<item><title>Title {n}</title><link>http://example.com/{n}</link>\
             <description>Desc {n}</description><source url=\"http://s{n}.com\">Source {n}</source>\
             <pubDate>Wed, 0{n} Jan 2020 00:00:00 GMT</pubDate></item>"
        )
    }

    #[test]
    fn test_single_item_projection() {
        let records = parse_feed(SINGLE_ITEM.as_bytes()).unwrap();

        assert_eq!(
            records,
            vec![ArticleRecord {
                title: "Example Title".to_string(),
                link: "http://example.com".to_string(),
                description: "This is an example description.".to_string(),
                source_name: "Example Source".to_string(),
                source_url: "http://source.com".to_string(),
                published_date: "Wed, 01 Jan 2020 00:00:00 GMT".to_string(),
            }]
        );
    }

    #[test]
    fn test_items_keep_document_order() {
        let body: String = (1..=5).map(item).collect();
        let xml = format!("<rss version=\"2.0\"><channel><title>Feed</title>{}</channel></rss>", body);

        let records = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(records.len(), 5);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.title, format!("Title {}", i + 1));
            assert_eq!(record.source_url, format!("http://s{}.com", i + 1));
        }
    }

    #[test]
    fn test_repeated_child_uses_first_occurrence() {
        let xml = "<rss><channel><item><title>First</title><title>Second</title>\
                   <link>l</link><description>d</description><source url=\"u\">s</source>\
                   <pubDate>p</pubDate></item></channel></rss>";
        let records = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(records[0].title, "First");
    }

    #[test]
    fn test_only_first_channel_is_used() {
        let xml = format!(
            "<rss><channel>{}</channel><channel>{}{}</channel></rss>",
            item(1),
            item(2),
            item(3)
        );
        let records = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Title 1");
    }

    #[test]
    fn test_invalid_dates_and_urls_pass_through() {
        let xml = "<rss><channel><item><title>t</title><link>not a url</link>\
                   <description></description><source url=\"::\">s</source>\
                   <pubDate>sometime</pubDate></item></channel></rss>";
        let records = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(records[0].link, "not a url");
        assert_eq!(records[0].source_url, "::");
        assert_eq!(records[0].published_date, "sometime");
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn test_missing_channel_fails() {
        let err = parse_feed(b"<rss><item/></rss>").unwrap_err();
        assert!(matches!(err, Error::Parse(ref m) if m.contains("<channel>")));
    }

    #[test]
    fn test_missing_items_fails() {
        let err = parse_feed(b"<rss><channel><title>Empty</title></channel></rss>").unwrap_err();
        assert!(matches!(err, Error::Parse(ref m) if m.contains("<item>")));
    }

    #[test]
    fn test_wrong_root_fails() {
        let err = parse_feed(b"<feed><entry/></feed>").unwrap_err();
        assert!(matches!(err, Error::Parse(ref m) if m.contains("<rss>")));
    }

    #[test]
    fn test_one_malformed_item_fails_whole_feed() {
        let broken = "<item><title>No source</title><link>l</link><description>d</description>\
                      <pubDate>p</pubDate></item>";
        let xml = format!("<rss><channel>{}{}{}</channel></rss>", item(1), broken, item(3));

        let err = parse_feed(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse(ref m) if m == "Item 1 is missing <source>"));
    }

    #[test]
    fn test_source_without_url_fails() {
        let xml = "<rss><channel><item><title>t</title><link>l</link><description>d</description>\
                   <source>s</source><pubDate>p</pubDate></item></channel></rss>";
        let err = parse_feed(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse(ref m) if m.contains("url attribute")));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let err = parse_feed(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
