mod prompt_tests;
mod thumbnail_tests;

use crate::geometry::CropRect;
use crate::results::Deal;

fn deals(titles: &[&str]) -> Vec<Deal<usize>> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            Deal::new(
                (i / 2 + 1).to_string(),
                format!("https://x.test/{}", i),
                title.to_string(),
                CropRect::new(0, 0, 4, 4),
                i / 2,
                i / 2,
            )
        })
        .collect()
}
