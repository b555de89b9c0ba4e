#![no_main]

use libfuzzer_sys::fuzz_target;
use logmedic_remediation::{RegistryBuilder, SignatureLoader};

fuzz_target!(|data: &[u8]| {
    // YAML 파서는 &str을 받으므로 UTF-8 변환 필요
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        if let Ok(defs) = SignatureLoader::parse_yaml(yaml_str, "fuzz-input.yaml") {
            // 파싱에 성공한 정의는 패턴 컴파일과 중복 검사까지 크래시 없이 끝나야 함
            let _ = RegistryBuilder::new().extend("fuzz", defs).build();
        }
    }
});
