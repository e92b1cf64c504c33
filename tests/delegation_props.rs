// 参数转发是“全函数”：任意输入都原样到达后端 / 查询串
use std::sync::Mutex;

use proptest::prelude::*;
use qr_link::{AvatarLinks, Avatars, Client, QrBackend, QrLinkGenerator};

type Call = (String, i64, i64, bool);

#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
}

impl QrBackend for RecordingBackend {
    type Output = ();
    type Error = std::convert::Infallible;

    async fn get_qr(
        &self,
        text: &str,
        size: i64,
        margin: i64,
        download: bool,
    ) -> Result<(), std::convert::Infallible> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push((text.to_string(), size, margin, download));
        Ok(())
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("build runtime failed")
}

fn link_generator() -> QrLinkGenerator<AvatarLinks> {
    let client = Client::new()
        .set_endpoint("https://fra.cloud.appwrite.io/v1")
        .set_project("688230070011fbf10e1a");
    QrLinkGenerator::new(AvatarLinks::new(Avatars::new(client)))
}

proptest! {
    #[test]
    fn generator_forwards_any_input_unchanged(
        text in any::<String>(),
        size in any::<i64>(),
        margin in any::<i64>(),
        download in any::<bool>(),
    ) {
        let generator = QrLinkGenerator::new(RecordingBackend::default());
        let rt = runtime();

        let result = rt.block_on(generator.generate_qr(&text, size, margin, download));
        prop_assert!(result.is_ok());

        let calls = generator
            .backend()
            .calls
            .lock()
            .expect("calls lock poisoned")
            .clone();
        prop_assert_eq!(calls, vec![(text, size, margin, download)]);
    }

    #[test]
    fn qr_link_round_trips_through_query_string(
        text in any::<String>(),
        size in any::<i64>(),
        margin in any::<i64>(),
        download in any::<bool>(),
    ) {
        let generator = link_generator();
        let rt = runtime();

        let url = rt
            .block_on(generator.generate_qr(&text, size, margin, download))
            .expect("link should build");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        prop_assert_eq!(url.path(), "/v1/avatars/qr");
        prop_assert_eq!(
            pairs,
            vec![
                ("text".to_string(), text),
                ("size".to_string(), size.to_string()),
                ("margin".to_string(), margin.to_string()),
                ("download".to_string(), download.to_string()),
                ("project".to_string(), "688230070011fbf10e1a".to_string()),
            ]
        );
    }
}
