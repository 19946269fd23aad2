//! The instruction catalog.
//!
//! Every mnemonic is listed once per documented/undocumented family with the opcode byte, base cycle count and
//! page-cross penalty of each addressing mode it supports. The catalog is folded into a 256-entry table keyed
//! by the raw opcode byte, so decoding is a single index and no byte can stand in for "no mapping".
//! Sources: https://www.masswerk.at/6502/6502_instruction_set.html, https://www.nesdev.org/wiki/CPU_unofficial_opcodes

use super::addr_mode::AddressingMode::{self, *};
use std::fmt;

// Source: https://web.archive.org/web/20210428044647/http://www.obelisk.me.uk/6502/reference.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    ADC, // add with carry
    AND, // logical and
    ASL, // arithmetic shift left
    BCC, // branch if carry clear
    BCS, // branch if carry set
    BEQ, // branch if equal
    BIT, // bit test
    BMI, // branch if minus
    BNE, // branch if not equal
    BPL, // branch if positive
    BRK, // force interrupt
    BVC, // branch if overflow clear
    BVS, // branch if overflow set
    CLC, // clear carry flag
    CLD, // clear decimal mode
    CLI, // clear interrupt disable
    CLV, // clear overflow flag
    CMP, // compare
    CPX, // compare x register
    CPY, // compare y register
    DEC, // decrement memory
    DEX, // decrement x register
    DEY, // decrement y register
    EOR, // exclusive or
    INC, // increment memory
    INX, // increment x register
    INY, // increment y register
    JMP, // jump
    JSR, // jump to subroutine
    LDA, // load accumulator
    LDX, // load x register
    LDY, // load y register
    LSR, // logical shift right
    NOP, // no-op
    ORA, // logical inclusive or
    PHA, // push accumulator
    PHP, // push processor status
    PLA, // pull accumulator
    PLP, // pull processor status
    ROL, // rotate left
    ROR, // rotate right
    RTI, // return from interrupt
    RTS, // return from subroutine
    SBC, // subtract with carry
    SEC, // set carry flag
    SED, // set decimal flag
    SEI, // set interrupt disable
    STA, // store accumulator
    STX, // store x register
    STY, // store y register
    TAX, // transfer accumulator to x
    TAY, // transfer accumulator to y
    TSX, // transfer stack pointer to x
    TXA, // transfer x to accumulator
    TXS, // transfer x to stack pointer
    TYA, // transfer y to accumulator

    // undocumented
    SLO, // asl then ora
    RLA, // rol then and
    SRE, // lsr then eor
    RRA, // ror then adc
    SAX, // store a & x
    LAX, // lda then tax
    LXA, // (a | magic) & imm into a and x
    DCP, // dec then cmp
    ISC, // inc then sbc
    ANC, // and, carry copies bit 7
    ALR, // and then lsr a
    ARR, // and then ror a, odd flags
    XAA, // (a | magic) & x & imm into a
    AXS, // (a & x) - imm into x
    LAS, // mem & sp into a, x and sp
    TAS, // a & x into sp, then stored like sha
    SHA, // a & x & (high byte + 1)
    SHX, // x & (high byte + 1)
    SHY, // y & (high byte + 1)
    JAM, // locks the processor
}

impl Mnemonic {
    /// whether the instruction consumes the byte at its effective address.
    /// Stores and jumps only need the address.
    pub(crate) fn reads_operand(self) -> bool {
        use Mnemonic::*;
        !matches!(
            self,
            STA | STX | STY | SAX | SHA | SHX | SHY | TAS | JMP | JSR
        )
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// one addressing mode of a mnemonic: the byte that selects it and what it costs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub mode: AddressingMode,
    pub opcode: u8,
    pub cycles: u8,
    /// added when the resolver reports a page crossing
    pub extra: u8,
}

#[derive(Debug)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub official: bool,
    pub slots: Vec<Slot>,
}

/// a decoded opcode byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u8,
    pub extra: u8,
    pub official: bool,
}

lazy_static::lazy_static! {
    pub static ref INSTRUCTIONS: Vec<Instruction> = catalog();

    static ref OPCODES: [Option<Opcode>; 256] = {
        let mut table = [None; 256];
        for inst in INSTRUCTIONS.iter() {
            for slot in &inst.slots {
                debug_assert!(
                    table[slot.opcode as usize].is_none(),
                    "opcode {:#04x} claimed twice",
                    slot.opcode
                );
                table[slot.opcode as usize] = Some(Opcode {
                    mnemonic: inst.mnemonic,
                    mode: slot.mode,
                    cycles: slot.cycles,
                    extra: slot.extra,
                    official: inst.official,
                });
            }
        }
        table
    };
}

pub fn decode(opcode: u8) -> Option<Opcode> {
    OPCODES[opcode as usize]
}

fn s(mode: AddressingMode, opcode: u8, cycles: u8, extra: u8) -> Slot {
    Slot {
        mode,
        opcode,
        cycles,
        extra,
    }
}

fn documented(mnemonic: Mnemonic, slots: Vec<Slot>) -> Instruction {
    Instruction {
        mnemonic,
        official: true,
        slots,
    }
}

fn undocumented(mnemonic: Mnemonic, slots: Vec<Slot>) -> Instruction {
    Instruction {
        mnemonic,
        official: false,
        slots,
    }
}

fn implied(opcode: u8, cycles: u8) -> Vec<Slot> {
    vec![s(Implied, opcode, cycles, 0)]
}

// Group 1: ADC, AND, CMP, EOR, LDA, ORA, SBC. `base` is the (ind,X) opcode, aaa00001
fn group_one(base: u8) -> Vec<Slot> {
    vec![
        s(Immediate, base + 0x08, 2, 0),
        s(ZP, base + 0x04, 3, 0),
        s(ZP_X_Idxd, base + 0x14, 4, 0),
        s(Absolute, base + 0x0c, 4, 0),
        s(Abs_X_Idxd, base + 0x1c, 4, 1),
        s(Abs_Y_Idxd, base + 0x18, 4, 1),
        s(XIdxd_Indirect, base, 6, 0),
        s(Indirect_Y_Idxd, base + 0x10, 5, 1),
    ]
}

// ASL, LSR, ROL, ROR. `base` is the zero page opcode
fn shift(base: u8) -> Vec<Slot> {
    vec![
        s(Accumulator, base + 0x04, 2, 0),
        s(ZP, base, 5, 0),
        s(ZP_X_Idxd, base + 0x10, 6, 0),
        s(Absolute, base + 0x08, 6, 0),
        s(Abs_X_Idxd, base + 0x18, 7, 0),
    ]
}

// INC, DEC. `base` is the zero page opcode
fn step_memory(base: u8) -> Vec<Slot> {
    vec![
        s(ZP, base, 5, 0),
        s(ZP_X_Idxd, base + 0x10, 6, 0),
        s(Absolute, base + 0x08, 6, 0),
        s(Abs_X_Idxd, base + 0x18, 7, 0),
    ]
}

// SLO, RLA, SRE, RRA, DCP, ISC: a read-modify-write fused with an alu op. `base` is the (ind,X) opcode, aaa00011
fn rmw_combo(base: u8) -> Vec<Slot> {
    vec![
        s(ZP, base + 0x04, 5, 0),
        s(ZP_X_Idxd, base + 0x14, 6, 0),
        s(Absolute, base + 0x0c, 6, 0),
        s(Abs_X_Idxd, base + 0x1c, 7, 0),
        s(Abs_Y_Idxd, base + 0x18, 7, 0),
        s(XIdxd_Indirect, base, 8, 0),
        s(Indirect_Y_Idxd, base + 0x10, 8, 0),
    ]
}

fn catalog() -> Vec<Instruction> {
    use Mnemonic::*;

    let mut insts = vec![
        // load/stores
        documented(LDA, group_one(0xa1)),
        documented(
            LDX,
            vec![
                s(Immediate, 0xa2, 2, 0),
                s(ZP, 0xa6, 3, 0),
                s(ZP_Y_Idxd, 0xb6, 4, 0),
                s(Absolute, 0xae, 4, 0),
                s(Abs_Y_Idxd, 0xbe, 4, 1),
            ],
        ),
        documented(
            LDY,
            vec![
                s(Immediate, 0xa0, 2, 0),
                s(ZP, 0xa4, 3, 0),
                s(ZP_X_Idxd, 0xb4, 4, 0),
                s(Absolute, 0xac, 4, 0),
                s(Abs_X_Idxd, 0xbc, 4, 1),
            ],
        ),
        documented(
            STA,
            vec![
                s(ZP, 0x85, 3, 0),
                s(ZP_X_Idxd, 0x95, 4, 0),
                s(Absolute, 0x8d, 4, 0),
                s(Abs_X_Idxd, 0x9d, 5, 0),
                s(Abs_Y_Idxd, 0x99, 5, 0),
                s(XIdxd_Indirect, 0x81, 6, 0),
                s(Indirect_Y_Idxd, 0x91, 6, 0),
            ],
        ),
        documented(
            STX,
            vec![
                s(ZP, 0x86, 3, 0),
                s(ZP_Y_Idxd, 0x96, 4, 0),
                s(Absolute, 0x8e, 4, 0),
            ],
        ),
        documented(
            STY,
            vec![
                s(ZP, 0x84, 3, 0),
                s(ZP_X_Idxd, 0x94, 4, 0),
                s(Absolute, 0x8c, 4, 0),
            ],
        ),
        // comparisons
        documented(CMP, group_one(0xc1)),
        documented(
            CPX,
            vec![
                s(Immediate, 0xe0, 2, 0),
                s(ZP, 0xe4, 3, 0),
                s(Absolute, 0xec, 4, 0),
            ],
        ),
        documented(
            CPY,
            vec![
                s(Immediate, 0xc0, 2, 0),
                s(ZP, 0xc4, 3, 0),
                s(Absolute, 0xcc, 4, 0),
            ],
        ),
        documented(BIT, vec![s(ZP, 0x24, 3, 0), s(Absolute, 0x2c, 4, 0)]),
        // transfers
        documented(TAX, implied(0xaa, 2)),
        documented(TAY, implied(0xa8, 2)),
        documented(TXA, implied(0x8a, 2)),
        documented(TYA, implied(0x98, 2)),
        documented(TXS, implied(0x9a, 2)),
        documented(TSX, implied(0xba, 2)),
        // stack ops
        documented(PHP, implied(0x08, 3)),
        documented(PLP, implied(0x28, 4)),
        documented(PHA, implied(0x48, 3)),
        documented(PLA, implied(0x68, 4)),
        // logical and arithmetic ops
        documented(ORA, group_one(0x01)),
        documented(AND, group_one(0x21)),
        documented(EOR, group_one(0x41)),
        documented(ADC, group_one(0x61)),
        documented(SBC, group_one(0xe1)),
        // incrs and decrs
        documented(INC, step_memory(0xe6)),
        documented(DEC, step_memory(0xc6)),
        documented(INX, implied(0xe8, 2)),
        documented(INY, implied(0xc8, 2)),
        documented(DEX, implied(0xca, 2)),
        documented(DEY, implied(0x88, 2)),
        // shifts
        documented(ASL, shift(0x06)),
        documented(ROL, shift(0x26)),
        documented(LSR, shift(0x46)),
        documented(ROR, shift(0x66)),
        // jumps and calls
        documented(JMP, vec![s(Absolute, 0x4c, 3, 0), s(Indirect, 0x6c, 5, 0)]),
        documented(JSR, vec![s(Absolute, 0x20, 6, 0)]),
        documented(RTS, implied(0x60, 6)),
        documented(BRK, implied(0x00, 7)),
        documented(RTI, implied(0x40, 6)),
    ];

    // branches. The taken/page penalty comes back from the branch itself, not from the slot
    for (mnemonic, opcode) in [
        (BPL, 0x10),
        (BMI, 0x30),
        (BVC, 0x50),
        (BVS, 0x70),
        (BCC, 0x90),
        (BCS, 0xb0),
        (BNE, 0xd0),
        (BEQ, 0xf0),
    ] {
        insts.push(documented(mnemonic, vec![s(Relative, opcode, 2, 0)]));
    }

    // status flag changes
    for (mnemonic, opcode) in [
        (CLC, 0x18),
        (SEC, 0x38),
        (CLI, 0x58),
        (SEI, 0x78),
        (CLV, 0xb8),
        (CLD, 0xd8),
        (SED, 0xf8),
    ] {
        insts.push(documented(mnemonic, implied(opcode, 2)));
    }

    insts.push(documented(NOP, implied(0xea, 2)));

    // undocumented
    insts.extend([
        undocumented(SLO, rmw_combo(0x03)),
        undocumented(RLA, rmw_combo(0x23)),
        undocumented(SRE, rmw_combo(0x43)),
        undocumented(RRA, rmw_combo(0x63)),
        undocumented(DCP, rmw_combo(0xc3)),
        undocumented(ISC, rmw_combo(0xe3)),
        undocumented(
            SAX,
            vec![
                s(ZP, 0x87, 3, 0),
                s(ZP_Y_Idxd, 0x97, 4, 0),
                s(Absolute, 0x8f, 4, 0),
                s(XIdxd_Indirect, 0x83, 6, 0),
            ],
        ),
        undocumented(
            LAX,
            vec![
                s(ZP, 0xa7, 3, 0),
                s(ZP_Y_Idxd, 0xb7, 4, 0),
                s(Absolute, 0xaf, 4, 0),
                s(Abs_Y_Idxd, 0xbf, 4, 1),
                s(XIdxd_Indirect, 0xa3, 6, 0),
                s(Indirect_Y_Idxd, 0xb3, 5, 1),
            ],
        ),
        undocumented(LXA, vec![s(Immediate, 0xab, 2, 0)]),
        undocumented(ANC, vec![s(Immediate, 0x0b, 2, 0), s(Immediate, 0x2b, 2, 0)]),
        undocumented(ALR, vec![s(Immediate, 0x4b, 2, 0)]),
        undocumented(ARR, vec![s(Immediate, 0x6b, 2, 0)]),
        undocumented(XAA, vec![s(Immediate, 0x8b, 2, 0)]),
        undocumented(AXS, vec![s(Immediate, 0xcb, 2, 0)]),
        undocumented(SBC, vec![s(Immediate, 0xeb, 2, 0)]),
        undocumented(LAS, vec![s(Abs_Y_Idxd, 0xbb, 4, 1)]),
        undocumented(TAS, vec![s(Abs_Y_Idxd, 0x9b, 5, 0)]),
        undocumented(
            SHA,
            vec![s(Abs_Y_Idxd, 0x9f, 5, 0), s(Indirect_Y_Idxd, 0x93, 6, 0)],
        ),
        undocumented(SHX, vec![s(Abs_Y_Idxd, 0x9e, 5, 0)]),
        undocumented(SHY, vec![s(Abs_X_Idxd, 0x9c, 5, 0)]),
    ]);

    // NOPs that still fetch (and read) an operand
    let mut nops = Vec::new();
    for opcode in [0x1a, 0x3a, 0x5a, 0x7a, 0xda, 0xfa] {
        nops.push(s(Implied, opcode, 2, 0));
    }
    for opcode in [0x80, 0x82, 0x89, 0xc2, 0xe2] {
        nops.push(s(Immediate, opcode, 2, 0));
    }
    for opcode in [0x04, 0x44, 0x64] {
        nops.push(s(ZP, opcode, 3, 0));
    }
    for opcode in [0x14, 0x34, 0x54, 0x74, 0xd4, 0xf4] {
        nops.push(s(ZP_X_Idxd, opcode, 4, 0));
    }
    nops.push(s(Absolute, 0x0c, 4, 0));
    for opcode in [0x1c, 0x3c, 0x5c, 0x7c, 0xdc, 0xfc] {
        nops.push(s(Abs_X_Idxd, opcode, 4, 1));
    }
    insts.push(undocumented(NOP, nops));

    let jams: [u8; 12] = [
        0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xb2, 0xd2, 0xf2,
    ];
    insts.push(undocumented(
        JAM,
        jams.iter().map(|&opcode| s(Implied, opcode, 2, 0)).collect(),
    ));

    insts
}
