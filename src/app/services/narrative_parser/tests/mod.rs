//! Test fixtures for the HTML export parser
//!
//! Builds export documents with the same nesting the real export uses.


/// One entry block as it appears in the export
pub enum Entry<'a> {
    View {
        video_title: &'a str,
        video_url: &'a str,
        channel_title: &'a str,
        channel_url: &'a str,
        when: &'a str,
    },
    Ad {
        title: &'a str,
        url: &'a str,
        when: &'a str,
    },
    Survey {
        when: &'a str,
    },
}

/// Render entries into a complete export document
pub fn export_document(entries: &[Entry<'_>]) -> String {
    let mut body = String::new();
    for entry in entries {
        let content = match entry {
            Entry::View {
                video_title,
                video_url,
                channel_title,
                channel_url,
                when,
            } => format!(
                "Watched\u{a0}<a href=\"{}\">{}</a><br><a href=\"{}\">{}</a><br>{}<br>",
                video_url, video_title, channel_url, channel_title, when
            ),
            Entry::Ad { title, url, when } => {
                format!("Watched\u{a0}<a href=\"{}\">{}</a><br>{}<br>", url, title, when)
            }
            Entry::Survey { when } => format!("Answered survey question<br>{}<br>", when),
        };
        body.push_str(&entry_block(&content));
    }

    format!(
        "<html><head><meta charset=\"UTF-8\"><title>Watch history</title></head>\
         <body><div class=\"mdl-grid\">{}</div></body></html>",
        body
    )
}

/// Wrap content-cell markup in the surrounding entry structure
pub fn entry_block(content: &str) -> String {
    format!(
        "<div class=\"outer-cell mdl-cell mdl-cell--12-col mdl-shadow--2dp\">\
           <div class=\"mdl-grid\">\
             <div class=\"header-cell mdl-cell mdl-cell--12-col\"><p class=\"mdl-typography--title\">YouTube<br></p></div>\
             <div class=\"content-cell mdl-cell mdl-cell--6-col mdl-typography--body-1\">{}</div>\
             <div class=\"content-cell mdl-cell mdl-cell--6-col mdl-typography--body-1 mdl-typography--text-right\"></div>\
             <div class=\"content-cell mdl-cell mdl-cell--12-col mdl-typography--caption\"><b>Products:</b><br>\u{2003}YouTube<br></div>\
           </div>\
         </div>",
        content
    )
}

/// A view entry on a fixed channel
pub fn view<'a>(video_id_url: &'a str, when: &'a str) -> Entry<'a> {
    Entry::View {
        video_title: "Some video",
        video_url: video_id_url,
        channel_title: "Some channel",
        channel_url: "https://www.youtube.com/channel/UCsome",
        when,
    }
}
