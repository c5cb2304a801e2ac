// =====================
// 圧縮ステージ
// =====================
//
// JSON テキスト -> raw DEFLATE -> base64 (URL-safe, パディングなし)
// 出力は [A-Za-z0-9_-] だけなので、クエリの値としてそのまま置ける。

use std::io::{Read, Write};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};

/// 展開後の上限。細工されたリンクで巨大な展開をさせないため
pub const MAX_INFLATED_LEN: u64 = 256 * 1024;

pub fn compress(text: &str) -> String {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    // Vec への書き込みは失敗しない
    encoder
        .write_all(text.as_bytes())
        .expect("deflate into Vec<u8> cannot fail");
    let bytes = encoder.finish().expect("deflate into Vec<u8> cannot fail");
    URL_SAFE_NO_PAD.encode(bytes)
}

/// 壊れた入力には None を返す (パニックもエラーも出さない)
pub fn decompress(encoded: &str) -> Option<String> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;

    let mut decoder = DeflateDecoder::new(bytes.as_slice());
    let mut inflated = Vec::new();
    (&mut decoder)
        .take(MAX_INFLATED_LEN + 1)
        .read_to_end(&mut inflated)
        .ok()?;
    if inflated.len() as u64 > MAX_INFLATED_LEN {
        return None;
    }
    // ストリームの終端より後ろにバイトが残っていたら書き換えられたリンク
    if decoder.total_in() != bytes.len() as u64 {
        return None;
    }

    String::from_utf8(inflated).ok()
}
