//! Byte-level frame builders for tests

/// Tag/length/value with short or one-octet long form length
pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    if content.len() < 0x80 {
        out.push(content.len() as u8);
    } else {
        out.push(0x81);
        out.push(content.len() as u8);
    }
    out.extend_from_slice(content);
    out
}

/// TBCD IMSI with `f` filler
pub fn pack_imsi(digits: &str) -> [u8; 8] {
    let mut nibbles: Vec<u8> = digits.bytes().map(|c| c - b'0').collect();
    nibbles.resize(16, 0x0F);
    let mut out = [0u8; 8];
    for (i, pair) in nibbles.chunks(2).enumerate() {
        out[i] = pair[0] | (pair[1] << 4);
    }
    out
}

/// IMSI parameter: sequence header, then an 8-octet string
pub fn imsi_param(digits: &str) -> Vec<u8> {
    let mut out = vec![0x30, 0x0A, 0x04, 0x08];
    out.extend_from_slice(&pack_imsi(digits));
    out
}

/// Component portion holding one Invoke with a local operation code
pub fn invoke(op: u8, params: &[u8]) -> Vec<u8> {
    let mut body = vec![0x02, 0x01, 0x01, 0x02, 0x01, op];
    body.extend_from_slice(params);
    tlv(0x6C, &tlv(0xA1, &body))
}

/// Component portion holding one Return Result Last
pub fn return_result_last(op: u8) -> Vec<u8> {
    let body = [0x02, 0x01, 0x01, 0x30, 0x03, 0x02, 0x01, op];
    tlv(0x6C, &tlv(0xA2, &body))
}

pub fn begin(otid: &[u8], dialogue: Option<&[u8]>, components: &[u8]) -> Vec<u8> {
    let mut content = tlv(0x48, otid);
    content.extend_from_slice(dialogue.unwrap_or_default());
    content.extend_from_slice(components);
    tlv(0x62, &content)
}

pub fn continue_msg(
    otid: &[u8],
    dtid: &[u8],
    dialogue: Option<&[u8]>,
    components: &[u8],
) -> Vec<u8> {
    let mut content = tlv(0x48, otid);
    content.extend(tlv(0x49, dtid));
    content.extend_from_slice(dialogue.unwrap_or_default());
    content.extend_from_slice(components);
    tlv(0x65, &content)
}

/// M3UA Payload Data message carrying an SCCP UDT
#[derive(Debug, Default)]
pub struct FrameBuilder {
    leading: Vec<u8>,
    called_gt: Vec<u8>,
    calling_gt: Vec<u8>,
    tcap: Vec<u8>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network_appearance(self, na: u32) -> Self {
        self.raw_parameter(0x0200, &na.to_be_bytes())
    }

    pub fn routing_context(self, rc: u32) -> Self {
        self.raw_parameter(0x0006, &rc.to_be_bytes())
    }

    /// Parameter placed ahead of Protocol Data
    pub fn raw_parameter(mut self, tag: u16, value: &[u8]) -> Self {
        self.leading.extend(parameter(tag, value));
        self
    }

    pub fn called_gt(mut self, gt: &[u8]) -> Self {
        self.called_gt = gt.to_vec();
        self
    }

    pub fn calling_gt(mut self, gt: &[u8]) -> Self {
        self.calling_gt = gt.to_vec();
        self
    }

    pub fn tcap(mut self, tcap: Vec<u8>) -> Self {
        self.tcap = tcap;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let called = address(&self.called_gt);
        let calling = address(&self.calling_gt);

        let mut sccp = vec![0x09, 0x80];
        sccp.push(3);
        sccp.push((2 + called.len()) as u8);
        sccp.push((1 + called.len() + calling.len()) as u8);
        sccp.extend(&called);
        sccp.extend(&calling);
        sccp.push(self.tcap.len() as u8);
        sccp.extend(&self.tcap);

        // OPC, DPC, SI=3, NI=2, MP, SLS
        let mut pd = vec![0, 0, 0x03, 0xE9, 0, 0, 0x03, 0xEA, 0x03, 0x02, 0x00, 0x05];
        pd.extend(sccp);

        let mut params = self.leading;
        params.extend(parameter(0x0210, &pd));

        let mut frame = vec![0x01, 0x00, 0x01, 0x01];
        frame.extend(((8 + params.len()) as u32).to_be_bytes());
        frame.extend(params);
        frame
    }
}

/// Called/Calling party address: length, indicator, SSN, GT
fn address(gt: &[u8]) -> Vec<u8> {
    let mut out = vec![(gt.len() + 2) as u8, 0x12, 0x06];
    out.extend_from_slice(gt);
    out
}

/// M3UA parameter, unpadded so the frame ends on the last TCAP octet
fn parameter(tag: u16, value: &[u8]) -> Vec<u8> {
    let mut out = tag.to_be_bytes().to_vec();
    out.extend(((value.len() + 4) as u16).to_be_bytes());
    out.extend_from_slice(value);
    out
}
