//! Byte-stream builder for hand-assembled `.skel` test inputs.

pub(crate) fn push_varint(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let mut b = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            b |= 0x80;
        }
        out.push(b);
        if value == 0 {
            break;
        }
    }
}

pub(crate) fn push_f32_be(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn push_string(out: &mut Vec<u8>, s: Option<&str>) {
    match s {
        None => push_varint(out, 0),
        Some(s) => {
            let bytes = s.as_bytes();
            push_varint(out, (bytes.len() as u32) + 1);
            out.extend_from_slice(bytes);
        }
    }
}

#[derive(Default)]
pub(crate) struct SkelWriter {
    out: Vec<u8>,
}

impl SkelWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.out
    }

    pub(crate) fn u8(&mut self, v: u8) -> &mut Self {
        self.out.push(v);
        self
    }

    pub(crate) fn i8(&mut self, v: i8) -> &mut Self {
        self.out.push(v as u8);
        self
    }

    pub(crate) fn bool(&mut self, v: bool) -> &mut Self {
        self.u8(v as u8)
    }

    pub(crate) fn f32(&mut self, v: f32) -> &mut Self {
        push_f32_be(&mut self.out, v);
        self
    }

    pub(crate) fn f32s(&mut self, values: &[f32]) -> &mut Self {
        for &v in values {
            self.f32(v);
        }
        self
    }

    /// Unsigned varint, as used for counts and indices.
    pub(crate) fn varint(&mut self, v: u32) -> &mut Self {
        push_varint(&mut self.out, v);
        self
    }

    /// Index written as a varint.
    pub(crate) fn index(&mut self, v: usize) -> &mut Self {
        self.varint(v as u32)
    }

    /// Zig-zag encoded signed varint.
    pub(crate) fn varint_signed(&mut self, v: i32) -> &mut Self {
        self.varint(((v << 1) ^ (v >> 31)) as u32)
    }

    pub(crate) fn string(&mut self, s: Option<&str>) -> &mut Self {
        push_string(&mut self.out, s);
        self
    }

    pub(crate) fn str(&mut self, s: &str) -> &mut Self {
        self.string(Some(s))
    }

    pub(crate) fn color(&mut self, rgba: [u8; 4]) -> &mut Self {
        self.out.extend_from_slice(&rgba);
        self
    }

    pub(crate) fn u16s(&mut self, values: &[u16]) -> &mut Self {
        self.index(values.len());
        for v in values {
            self.out.extend_from_slice(&v.to_be_bytes());
        }
        self
    }
}
